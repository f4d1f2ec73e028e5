//! The wallet, tournament catalog and support desk of a mock esports
//! tournament platform.
//!
//! Everything lives in memory for one session: a user logs in with a
//! starting bonus, joins tournaments from a fixed catalog by paying entry fees
//! from the wallet, moves money in and out through Bikash or Nagad, and asks
//! an LLM backed support bot for help.
//!
//! ## Layout
//!
//! * [`ledger`] - the balance and the append-only transaction log
//! * [`session`] - the application state one event loop owns
//! * [`advisory`] - strategy tips and support replies, best effort
//! * [`message`] - the command language of the `game-arena` binary

// This file is part of game-arena.
//
// game-arena is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// game-arena is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

#![deny(clippy::panic)]

pub mod advisory;
pub mod chat;
pub mod config;
pub mod game_type;
pub mod ledger;
pub mod message;
pub mod participation;
pub mod session;
pub mod tournament;
pub mod transaction;
pub mod user;
pub mod utils;

/// Every new account starts with this much in the wallet.
pub const STARTING_BONUS: u64 = 100;

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2026 Developers of the game-arena project

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2026 Developers of the game-arena project
Licensed under the AGPLv3"
);
