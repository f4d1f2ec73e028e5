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

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The label used for strategy requests when no game is selected.
pub const ALL_GAMES_LABEL: &str = "Battle Royale";

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum GameType {
    FreeFire,
    Ludo,
    Bgmi,
    Valorant,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeFire => write!(f, "Free Fire"),
            Self::Ludo => write!(f, "Ludo King"),
            Self::Bgmi => write!(f, "BGMI"),
            Self::Valorant => write!(f, "Valorant"),
        }
    }
}

impl FromStr for GameType {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        let lower = string.trim().to_lowercase().replace(['_', '-', ' '], "");

        match lower.as_str() {
            "freefire" | "ff" => Ok(Self::FreeFire),
            "ludo" | "ludoking" => Ok(Self::Ludo),
            "bgmi" => Ok(Self::Bgmi),
            "valorant" => Ok(Self::Valorant),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a GameType!"
            ))),
        }
    }
}

/// Which games the dashboard shows.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameFilter {
    #[default]
    All,
    Game(GameType),
}

impl GameFilter {
    #[must_use]
    pub fn matches(self, game: GameType) -> bool {
        match self {
            Self::All => true,
            Self::Game(selected) => selected == game,
        }
    }

    /// The game name sent to the advisory service.
    #[must_use]
    pub fn strategy_label(self) -> String {
        match self {
            Self::All => ALL_GAMES_LABEL.to_string(),
            Self::Game(game) => game.to_string(),
        }
    }
}

impl fmt::Display for GameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Game(game) => write!(f, "{game}"),
        }
    }
}

impl FromStr for GameFilter {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        if string.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Game(string.parse()?))
        }
    }
}
