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

use std::{borrow::Cow, str::FromStr};

use anyhow::Context;

use crate::{game_type::GameFilter, transaction::PaymentMethod};

pub const COMMANDS: [&str; 17] = [
    "balance",
    "chat",
    "deposit",
    "filter",
    "join",
    "joined",
    "list_commands",
    "login",
    "logout",
    "quit",
    "strategies",
    "support",
    "tournaments",
    "transactions",
    "whoami",
    "win",
    "withdraw",
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    Balance,
    Chat,
    Deposit {
        amount: u64,
        method: PaymentMethod,
        account_number: String,
    },
    Empty,
    Filter(GameFilter),
    Join(String),
    Joined,
    ListCommands,
    Login {
        username: String,
        email: String,
    },
    Logout,
    Quit,
    Strategies,
    Support(String),
    Tournaments,
    Transactions,
    WhoAmI,
    Win {
        tournament_id: String,
        rank: u32,
        amount: u64,
    },
    Withdraw {
        amount: u64,
        method: PaymentMethod,
        account_number: String,
    },
}

impl Message {
    /// Parses one line of input. A `#` that starts a word begins a comment,
    /// except on `support` lines, which are sent as typed.
    ///
    /// # Errors
    ///
    /// If the line isn't a valid command.
    pub fn from_line(buffer: &str) -> anyhow::Result<Self> {
        let mut buffer = Cow::from(buffer);
        if buffer.split_whitespace().next() != Some("support")
            && let Some(offset) = comment_offset(&buffer)
        {
            buffer.to_mut().replace_range(offset.., "");
        }

        buffer.parse()
    }
}

fn comment_offset(line: &str) -> Option<usize> {
    let mut previous: Option<char> = None;
    for (offset, c) in line.char_indices() {
        if c == '#' && previous.is_none_or(char::is_whitespace) {
            return Some(offset);
        }
        previous = Some(c);
    }

    None
}

impl FromStr for Message {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, rest)| (command, rest.trim()));
        let args: Vec<&str> = rest.split_ascii_whitespace().collect();

        match command {
            "" => Ok(Self::Empty),
            "balance" => Ok(Self::Balance),
            "chat" => Ok(Self::Chat),
            "deposit" => {
                let (amount, method, account_number) = transfer(command, &args)?;
                Ok(Self::Deposit {
                    amount,
                    method,
                    account_number,
                })
            }
            "filter" => {
                let filter = args.first().copied().unwrap_or("all");
                Ok(Self::Filter(rest.parse().or_else(|_| filter.parse())?))
            }
            "join" => {
                let id = args.first().context("expected: 'join TOURNAMENT_ID'")?;
                Ok(Self::Join((*id).to_string()))
            }
            "joined" => Ok(Self::Joined),
            "list_commands" => Ok(Self::ListCommands),
            "login" => {
                let [username, email] = args.as_slice() else {
                    return Err(anyhow::Error::msg("expected: 'login USERNAME EMAIL'"));
                };
                Ok(Self::Login {
                    username: (*username).to_string(),
                    email: (*email).to_string(),
                })
            }
            "logout" => Ok(Self::Logout),
            "quit" => Ok(Self::Quit),
            "strategies" => Ok(Self::Strategies),
            "support" => Ok(Self::Support(rest.to_string())),
            "tournaments" => Ok(Self::Tournaments),
            "transactions" => Ok(Self::Transactions),
            "whoami" => Ok(Self::WhoAmI),
            "win" => {
                let err_msg = "expected: 'win TOURNAMENT_ID RANK AMOUNT'";
                let [tournament_id, rank, amount] = args.as_slice() else {
                    return Err(anyhow::Error::msg(err_msg));
                };
                Ok(Self::Win {
                    tournament_id: (*tournament_id).to_string(),
                    rank: rank.parse().context("win: RANK is not an integer")?,
                    amount: amount.parse().context("win: AMOUNT is not an integer")?,
                })
            }
            "withdraw" => {
                let (amount, method, account_number) = transfer(command, &args)?;
                Ok(Self::Withdraw {
                    amount,
                    method,
                    account_number,
                })
            }
            _ => Err(anyhow::Error::msg(format!("unknown command: {command}"))),
        }
    }
}

fn transfer(command: &str, args: &[&str]) -> anyhow::Result<(u64, PaymentMethod, String)> {
    let [amount, method, account_number] = args else {
        return Err(anyhow::Error::msg(format!(
            "expected: '{command} AMOUNT bikash|nagad ACCOUNT_NUMBER'"
        )));
    };

    let amount = amount
        .parse::<u64>()
        .with_context(|| format!("{command}: AMOUNT is not a whole number"))?;

    Ok((amount, method.parse()?, (*account_number).to_string()))
}
