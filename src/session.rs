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

//! The whole application state for one running session.
//!
//! A [`Session`] is owned by a single event loop. Commands mutate it
//! synchronously in the order they arrive. Advisory work is queued in an
//! outbox for the owner to dispatch, and the replies come back through
//! [`Session::receive`]. Every login and logout starts a new generation, and
//! replies to requests from an earlier generation are dropped.

use std::{
    collections::VecDeque,
    fmt::{self, Write as _},
};

use log::{debug, info};
use thiserror::Error;

use crate::{
    advisory::{AdvisoryReply, AdvisoryRequest, Strategy},
    chat::SupportChat,
    game_type::GameFilter,
    ledger::{Ledger, LedgerError},
    message::{COMMANDS, Message},
    tournament::{Catalog, MatchResult},
    transaction::{PaymentMethod, Transaction},
    user::{Credentials, User},
    utils::new_id,
};

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SessionError {
    #[error("session: you have to enter a username")]
    MissingUsername,
    #[error("session: you have to enter an email")]
    MissingEmail,
    #[error("session: you are already logged in as {0}")]
    AlreadyLoggedIn(String),
    #[error("session: you have to log in first")]
    NotLoggedIn,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Default)]
pub struct Session {
    catalog: Catalog,
    ledger: Option<Ledger>,
    filter: GameFilter,
    strategies: Vec<Strategy>,
    loading_strategies: bool,
    chat: SupportChat,
    outbox: VecDeque<AdvisoryRequest>,
    generation: u64,
}

impl Session {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.ledger.as_ref().map(Ledger::user)
    }

    /// # Errors
    ///
    /// If nobody is logged in.
    pub fn ledger(&self) -> Result<&Ledger, SessionError> {
        self.ledger.as_ref().ok_or(SessionError::NotLoggedIn)
    }

    #[must_use]
    pub fn filter(&self) -> GameFilter {
        self.filter
    }

    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    #[must_use]
    pub fn loading_strategies(&self) -> bool {
        self.loading_strategies
    }

    #[must_use]
    pub fn chat(&self) -> &SupportChat {
        &self.chat
    }

    /// Starts a session with the starting bonus and asks for tips for the
    /// current filter.
    ///
    /// # Errors
    ///
    /// If someone is already logged in or the credentials are blank.
    pub fn login(&mut self, credentials: Credentials) -> Result<&User, SessionError> {
        if let Some(user) = self.user() {
            return Err(SessionError::AlreadyLoggedIn(user.username.clone()));
        }

        let user = credentials.into_user()?;
        info!("login: {} <{}>", user.username, user.email);

        self.generation += 1;
        let ledger = self.ledger.insert(Ledger::new(user));
        self.outbox.push_back(AdvisoryRequest::Strategies {
            generation: self.generation,
            label: self.filter.strategy_label(),
        });
        self.loading_strategies = true;

        Ok(ledger.user())
    }

    /// Discards everything the session held.
    ///
    /// # Errors
    ///
    /// If nobody is logged in.
    pub fn logout(&mut self) -> Result<User, SessionError> {
        let ledger = self.ledger.take().ok_or(SessionError::NotLoggedIn)?;
        info!(
            "logout: {} with {} transactions",
            ledger.user().username,
            ledger.transactions().len()
        );

        *self = Self {
            catalog: std::mem::take(&mut self.catalog),
            generation: self.generation + 1,
            ..Self::default()
        };

        Ok(ledger.user().clone())
    }

    /// # Errors
    ///
    /// If nobody is logged in or the ledger rejects the deposit.
    pub fn deposit(
        &mut self,
        amount: u64,
        method: PaymentMethod,
        account_number: &str,
    ) -> Result<Transaction, SessionError> {
        self.apply(|ledger| ledger.deposit(amount, method, account_number))
    }

    /// # Errors
    ///
    /// If nobody is logged in or the ledger rejects the withdrawal.
    pub fn withdraw(
        &mut self,
        amount: u64,
        method: PaymentMethod,
        account_number: &str,
    ) -> Result<Transaction, SessionError> {
        self.apply(|ledger| ledger.withdraw(amount, method, account_number))
    }

    /// # Errors
    ///
    /// If nobody is logged in, the tournament doesn't exist, was already
    /// joined, or costs more than the balance.
    pub fn join(&mut self, tournament_id: &str) -> Result<Transaction, SessionError> {
        self.ledger()?;
        let tournament = self
            .catalog
            .get(tournament_id)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownTournament(tournament_id.to_string()))?;

        self.apply(|ledger| ledger.join(&tournament))
    }

    #[must_use]
    pub fn is_joined(&self, tournament_id: &str) -> bool {
        self.ledger
            .as_ref()
            .is_some_and(|ledger| ledger.is_joined(tournament_id))
    }

    /// # Errors
    ///
    /// If nobody is logged in, the tournament doesn't exist or wasn't
    /// joined, or the winnings are zero.
    pub fn record_winnings(&mut self, result: &MatchResult) -> Result<Transaction, SessionError> {
        self.ledger()?;
        if self.catalog.get(&result.tournament_id).is_none() {
            return Err(LedgerError::UnknownTournament(result.tournament_id.clone()).into());
        }

        self.apply(|ledger| ledger.record_winnings(result))
    }

    fn apply<F>(&mut self, operation: F) -> Result<Transaction, SessionError>
    where
        F: FnOnce(&Ledger) -> Result<(Ledger, Transaction), LedgerError>,
    {
        let ledger = self.ledger.as_mut().ok_or(SessionError::NotLoggedIn)?;

        match operation(ledger) {
            Ok((next, transaction)) => {
                *ledger = next;
                info!(
                    "ledger: {} {} balance: {}",
                    transaction.kind,
                    transaction.amount,
                    ledger.balance()
                );
                Ok(transaction)
            }
            Err(err) => {
                debug!("ledger: rejected: {err}");
                Err(err.into())
            }
        }
    }

    /// Changes the dashboard filter and asks for fresh tips.
    ///
    /// # Errors
    ///
    /// If nobody is logged in.
    pub fn set_filter(&mut self, filter: GameFilter) -> Result<(), SessionError> {
        self.ledger()?;

        self.filter = filter;
        self.strategies.clear();
        self.loading_strategies = true;
        self.outbox.push_back(AdvisoryRequest::Strategies {
            generation: self.generation,
            label: filter.strategy_label(),
        });

        Ok(())
    }

    /// Returns false if the question was blank.
    ///
    /// # Errors
    ///
    /// If nobody is logged in.
    pub fn ask_support(&mut self, question: &str) -> Result<bool, SessionError> {
        self.ledger()?;

        match self.chat.ask(question) {
            Some(question) => {
                self.outbox.push_back(AdvisoryRequest::Support {
                    generation: self.generation,
                    question,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Takes the advisory requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<AdvisoryRequest> {
        self.outbox.drain(..).collect()
    }

    /// Applies an advisory reply. Returns true if it changed anything.
    ///
    /// Strategy replies for a filter other than the current one are stale and
    /// dropped, as is anything asked before the last login or logout.
    pub fn receive(&mut self, reply: AdvisoryReply) -> bool {
        if self.ledger.is_none() || reply.generation() != self.generation {
            debug!(
                "advisory: dropping a reply from generation {}, now {}",
                reply.generation(),
                self.generation
            );
            return false;
        }

        match reply {
            AdvisoryReply::Strategies {
                label, strategies, ..
            } => {
                if label != self.filter.strategy_label() {
                    debug!("advisory: dropping stale strategies for {label}");
                    return false;
                }

                self.strategies = strategies;
                self.loading_strategies = false;
                true
            }
            AdvisoryReply::Support { text, .. } => {
                if self.chat.waiting == 0 {
                    debug!("advisory: dropping an unexpected support reply");
                    return false;
                }

                self.chat.reply(&text);
                true
            }
        }
    }

    /// # Errors
    ///
    /// If the line isn't a command or the command fails.
    pub fn read_line(&mut self, buffer: &str) -> anyhow::Result<Option<String>> {
        self.update(Message::from_line(buffer)?)
    }

    /// # Errors
    ///
    /// If the command fails.
    #[allow(clippy::too_many_lines)]
    pub fn update(&mut self, message: Message) -> anyhow::Result<Option<String>> {
        match message {
            Message::Balance => Ok(Some(self.ledger()?.balance().to_string())),
            Message::Chat => Ok(Some(self.chat.to_string().trim_end().to_string())),
            Message::Deposit {
                amount,
                method,
                account_number,
            } => {
                self.deposit(amount, method, &account_number)?;
                Ok(Some(format!("{amount} deposited successfully via {method}!")))
            }
            Message::Empty | Message::Quit => Ok(None),
            Message::Filter(filter) => {
                self.set_filter(filter)?;
                Ok(Some(self.tournaments()?))
            }
            Message::Join(tournament_id) => {
                self.join(&tournament_id)?;
                let title = self
                    .catalog
                    .get(&tournament_id)
                    .map_or(tournament_id.as_str(), |tournament| tournament.title.as_str());
                Ok(Some(format!(
                    "Successfully joined {title}! Room ID will be provided 15 mins before start."
                )))
            }
            Message::Joined => Ok(Some(self.ledger()?.participation().to_string())),
            Message::ListCommands => Ok(Some(COMMANDS.join(" "))),
            Message::Login { username, email } => {
                let user = self.login(Credentials { username, email })?;
                Ok(Some(format!("Welcome Back, {}!", user.username)))
            }
            Message::Logout => {
                let user = self.logout()?;
                Ok(Some(format!("Goodbye, {}!", user.username)))
            }
            Message::Strategies => Ok(Some(self.strategies_text()?)),
            Message::Support(question) => {
                if self.ask_support(&question)? {
                    Ok(Some("ArenaBot is typing ...".to_string()))
                } else {
                    Ok(None)
                }
            }
            Message::Tournaments => Ok(Some(self.tournaments()?)),
            Message::Transactions => {
                let ledger = self.ledger()?;
                if ledger.transactions().is_empty() {
                    return Ok(Some("No transactions yet.".to_string()));
                }

                let mut text = String::new();
                for transaction in ledger.transactions().iter().rev() {
                    writeln!(text, "{transaction}")?;
                }
                Ok(Some(text.trim_end().to_string()))
            }
            Message::WhoAmI => Ok(Some(self.ledger()?.user().to_string())),
            Message::Win {
                tournament_id,
                rank,
                amount,
            } => {
                let player = self.ledger()?.user().username.clone();
                let result = MatchResult {
                    id: new_id(),
                    tournament_id,
                    rank,
                    player,
                    winnings: amount,
                };
                self.record_winnings(&result)?;
                Ok(Some(format!(
                    "{amount} won in tournament {}!",
                    result.tournament_id
                )))
            }
            Message::Withdraw {
                amount,
                method,
                account_number,
            } => {
                self.withdraw(amount, method, &account_number)?;
                Ok(Some(format!(
                    "Withdrawal request of {amount} to {method} ({}) submitted successfully!",
                    account_number.trim()
                )))
            }
        }
    }

    fn tournaments(&self) -> Result<String, fmt::Error> {
        let mut text = String::new();
        for tournament in self.catalog.filtered(self.filter) {
            let joined = if self.is_joined(&tournament.id) {
                " | joined"
            } else {
                ""
            };
            writeln!(text, "{tournament}{joined}")?;
        }

        if text.is_empty() {
            Ok(format!("No {} tournaments.", self.filter))
        } else {
            Ok(text.trim_end().to_string())
        }
    }

    fn strategies_text(&self) -> anyhow::Result<String> {
        self.ledger()?;

        if self.loading_strategies {
            return Ok("AI PRO TIPS: loading ...".to_string());
        }
        if self.strategies.is_empty() {
            return Ok("AI PRO TIPS: none right now.".to_string());
        }

        let mut text = "AI PRO TIPS".to_string();
        for strategy in &self.strategies {
            write!(text, "\n{strategy}")?;
        }
        Ok(text)
    }
}
