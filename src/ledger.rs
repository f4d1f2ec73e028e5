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

//! The wallet: a user's balance, the append-only log of transactions that
//! produced it, and the tournaments paid for.
//!
//! Every operation borrows the current state and returns the next one along
//! with the transaction it appended. On error nothing is returned, so the
//! caller still holds the untouched state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    participation::Participation,
    tournament::{MatchResult, Tournament},
    transaction::{PaymentMethod, Transaction, TransactionKind, TransactionStatus},
    user::User,
    utils::new_id,
};

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LedgerError {
    #[error("ledger: the amount has to be greater than zero")]
    InvalidAmount,
    #[error("ledger: you have to enter your account number")]
    MissingAccountNumber,
    #[error("ledger: {0} can't be used to move money in or out")]
    InternalMethod(PaymentMethod),
    #[error("ledger: insufficient balance, you have {balance} but need {needed}")]
    InsufficientBalance { balance: u64, needed: u64 },
    #[error("ledger: you already joined tournament {0}")]
    AlreadyJoined(String),
    #[error("ledger: you haven't joined tournament {0}")]
    NotJoined(String),
    #[error("ledger: there is no tournament {0}")]
    UnknownTournament(String),
    #[error("ledger: the balance would overflow")]
    Overflow,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ledger {
    user: User,
    opening_balance: u64,
    transactions: Vec<Transaction>,
    participation: Participation,
}

impl Ledger {
    /// Opens a ledger whose opening balance is whatever the user holds now.
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            opening_balance: user.balance,
            user,
            transactions: Vec::new(),
            participation: Participation::default(),
        }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn balance(&self) -> u64 {
        self.user.balance
    }

    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    #[must_use]
    pub fn participation(&self) -> &Participation {
        &self.participation
    }

    #[must_use]
    pub fn is_joined(&self, tournament_id: &str) -> bool {
        self.participation.is_joined(tournament_id)
    }

    /// Replays the transaction log on top of the opening balance.
    ///
    /// Returns `None` if the log does not add up, which would mean the
    /// log and the balance have diverged.
    #[must_use]
    pub fn derived_balance(&self) -> Option<u64> {
        self.transactions
            .iter()
            .filter(|transaction| transaction.status == TransactionStatus::Success)
            .try_fold(self.opening_balance, |balance, transaction| {
                if transaction.kind.is_credit() {
                    balance.checked_add(transaction.amount)
                } else {
                    balance.checked_sub(transaction.amount)
                }
            })
    }

    /// # Errors
    ///
    /// If the amount is zero, the method is the wallet itself, the account
    /// number is blank, or the balance would overflow.
    pub fn deposit(
        &self,
        amount: u64,
        method: PaymentMethod,
        account_number: &str,
    ) -> Result<(Self, Transaction), LedgerError> {
        let account_number = validate_transfer(amount, method, account_number)?;
        let balance = self
            .balance()
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        Ok(self.append(
            TransactionKind::Deposit,
            amount,
            Some(method),
            Some(account_number),
            balance,
        ))
    }

    /// # Errors
    ///
    /// If the amount is zero, the method is the wallet itself, the account
    /// number is blank, or the amount is more than the balance.
    pub fn withdraw(
        &self,
        amount: u64,
        method: PaymentMethod,
        account_number: &str,
    ) -> Result<(Self, Transaction), LedgerError> {
        let account_number = validate_transfer(amount, method, account_number)?;
        let balance = self.debit(amount)?;

        Ok(self.append(
            TransactionKind::Withdrawal,
            amount,
            Some(method),
            Some(account_number),
            balance,
        ))
    }

    /// Pays the entry fee from the wallet and marks the tournament joined.
    ///
    /// # Errors
    ///
    /// If the tournament was already joined or the balance is below the fee.
    pub fn join(&self, tournament: &Tournament) -> Result<(Self, Transaction), LedgerError> {
        if self.is_joined(&tournament.id) {
            return Err(LedgerError::AlreadyJoined(tournament.id.clone()));
        }

        let balance = self.debit(tournament.entry_fee)?;
        let (mut ledger, transaction) = self.append(
            TransactionKind::EntryFee,
            tournament.entry_fee,
            Some(PaymentMethod::Wallet),
            None,
            balance,
        );
        ledger.participation.insert(&tournament.id);

        Ok((ledger, transaction))
    }

    /// Credits prize money for a tournament the user took part in.
    ///
    /// # Errors
    ///
    /// If the tournament was never joined, the winnings are zero, or the
    /// balance would overflow.
    pub fn record_winnings(
        &self,
        result: &MatchResult,
    ) -> Result<(Self, Transaction), LedgerError> {
        if !self.is_joined(&result.tournament_id) {
            return Err(LedgerError::NotJoined(result.tournament_id.clone()));
        }
        if result.winnings == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let balance = self
            .balance()
            .checked_add(result.winnings)
            .ok_or(LedgerError::Overflow)?;

        Ok(self.append(
            TransactionKind::Winnings,
            result.winnings,
            Some(PaymentMethod::Wallet),
            None,
            balance,
        ))
    }

    fn debit(&self, amount: u64) -> Result<u64, LedgerError> {
        self.balance()
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                balance: self.balance(),
                needed: amount,
            })
    }

    fn append(
        &self,
        kind: TransactionKind,
        amount: u64,
        method: Option<PaymentMethod>,
        account_number: Option<String>,
        balance: u64,
    ) -> (Self, Transaction) {
        let transaction = Transaction {
            id: new_id(),
            user_id: self.user.id.clone(),
            kind,
            amount,
            method,
            account_number,
            timestamp: Utc::now(),
            status: TransactionStatus::Success,
        };

        let mut ledger = self.clone();
        ledger.user.balance = balance;
        ledger.transactions.push(transaction.clone());

        (ledger, transaction)
    }
}

fn validate_transfer(
    amount: u64,
    method: PaymentMethod,
    account_number: &str,
) -> Result<String, LedgerError> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }
    if !method.is_external() {
        return Err(LedgerError::InternalMethod(method));
    }

    let account_number = account_number.trim();
    if account_number.is_empty() {
        return Err(LedgerError::MissingAccountNumber);
    }

    Ok(account_number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        tournament::Catalog,
        user::{Credentials, User},
    };

    const ACCOUNT: &str = "01711111111";

    fn user() -> User {
        Credentials {
            username: "ProGamer99".to_string(),
            email: "name@example.com".to_string(),
        }
        .into_user()
        .unwrap()
    }

    fn tournament(id: &str) -> Tournament {
        Catalog::default().get(id).cloned().unwrap()
    }

    fn assert_consistent(ledger: &Ledger) {
        assert_eq!(ledger.derived_balance(), Some(ledger.balance()));
    }

    #[test]
    fn deposit_via_bikash() {
        let ledger = Ledger::new(user());
        let (ledger, transaction) = ledger.deposit(50, PaymentMethod::Bikash, ACCOUNT).unwrap();

        assert_eq!(ledger.balance(), 150);
        assert_eq!(ledger.transactions().len(), 1);
        assert_eq!(transaction.kind, TransactionKind::Deposit);
        assert_eq!(transaction.amount, 50);
        assert_eq!(transaction.status, TransactionStatus::Success);
        assert_eq!(transaction.method, Some(PaymentMethod::Bikash));
        assert_eq!(transaction.account_number.as_deref(), Some(ACCOUNT));
        assert_eq!(transaction.user_id, "user_1");
        assert_consistent(&ledger);
    }

    #[test]
    fn deposit_rejects_bad_input() {
        let ledger = Ledger::new(user());

        assert_eq!(
            ledger.deposit(0, PaymentMethod::Nagad, ACCOUNT),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            ledger.deposit(10, PaymentMethod::Nagad, "   "),
            Err(LedgerError::MissingAccountNumber)
        );
        assert_eq!(
            ledger.deposit(10, PaymentMethod::Wallet, ACCOUNT),
            Err(LedgerError::InternalMethod(PaymentMethod::Wallet))
        );
        assert_eq!(
            ledger.deposit(u64::MAX, PaymentMethod::Nagad, ACCOUNT),
            Err(LedgerError::Overflow)
        );
    }

    #[test]
    fn withdrawing_too_much_changes_nothing() {
        let ledger = Ledger::new(user());

        assert_eq!(
            ledger.withdraw(200, PaymentMethod::Nagad, ACCOUNT),
            Err(LedgerError::InsufficientBalance {
                balance: 100,
                needed: 200
            })
        );
        assert_eq!(ledger.balance(), 100);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn withdraw_everything() {
        let ledger = Ledger::new(user());
        let (ledger, transaction) = ledger.withdraw(100, PaymentMethod::Nagad, ACCOUNT).unwrap();

        assert_eq!(ledger.balance(), 0);
        assert_eq!(transaction.kind, TransactionKind::Withdrawal);
        assert_consistent(&ledger);
    }

    #[test]
    fn join_pays_the_entry_fee() {
        let ledger = Ledger::new(user());
        let (ledger, _) = ledger.deposit(50, PaymentMethod::Bikash, ACCOUNT).unwrap();
        let (ledger, transaction) = ledger.join(&tournament("1")).unwrap();

        assert_eq!(ledger.balance(), 100);
        assert!(ledger.is_joined("1"));
        assert_eq!(transaction.kind, TransactionKind::EntryFee);
        assert_eq!(transaction.amount, 50);
        assert_eq!(transaction.method, Some(PaymentMethod::Wallet));
        assert_eq!(transaction.account_number, None);
        assert_consistent(&ledger);
    }

    #[test]
    fn joining_twice_does_nothing_the_second_time() {
        let (ledger, _) = Ledger::new(user()).join(&tournament("2")).unwrap();

        assert_eq!(
            ledger.join(&tournament("2")),
            Err(LedgerError::AlreadyJoined("2".to_string()))
        );
        assert_eq!(ledger.balance(), 80);
        assert_eq!(ledger.participation().len(), 1);
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn joining_with_exactly_the_fee_leaves_zero() {
        let (ledger, _) = Ledger::new(user()).join(&tournament("4")).unwrap();

        assert_eq!(ledger.balance(), 0);
        assert!(ledger.is_joined("4"));
        assert_consistent(&ledger);
    }

    #[test]
    fn joining_without_the_fee_is_rejected() {
        let (ledger, _) = Ledger::new(user())
            .withdraw(60, PaymentMethod::Bikash, ACCOUNT)
            .unwrap();

        assert_eq!(
            ledger.join(&tournament("1")),
            Err(LedgerError::InsufficientBalance {
                balance: 40,
                needed: 50
            })
        );
        assert!(!ledger.is_joined("1"));
    }

    #[test]
    fn winnings_require_participation() {
        let result = MatchResult {
            id: "r1".to_string(),
            tournament_id: "3".to_string(),
            rank: 1,
            player: "ProGamer99".to_string(),
            winnings: 400,
        };
        let ledger = Ledger::new(user());

        assert_eq!(
            ledger.record_winnings(&result),
            Err(LedgerError::NotJoined("3".to_string()))
        );

        let (ledger, _) = ledger.join(&tournament("3")).unwrap();
        let (ledger, transaction) = ledger.record_winnings(&result).unwrap();

        assert_eq!(ledger.balance(), 490);
        assert_eq!(transaction.kind, TransactionKind::Winnings);
        assert_consistent(&ledger);

        let nothing = MatchResult {
            winnings: 0,
            ..result
        };
        assert_eq!(
            ledger.record_winnings(&nothing),
            Err(LedgerError::InvalidAmount)
        );
    }

    #[test]
    fn the_balance_matches_the_log_after_any_sequence() {
        let catalog = Catalog::default();
        let mut ledger = Ledger::new(user());
        let mut expected: i128 = 100;

        for step in 0..200_u64 {
            let next = match step % 5 {
                0 => ledger.deposit(step % 37, PaymentMethod::Bikash, ACCOUNT),
                1 => ledger.withdraw(step % 53, PaymentMethod::Nagad, ACCOUNT),
                2 => ledger.join(&catalog.0[usize::try_from(step % 4).unwrap()]),
                3 => ledger.withdraw(step * 3, PaymentMethod::Bikash, ACCOUNT),
                _ => ledger.deposit(step, PaymentMethod::Nagad, "  "),
            };

            if let Ok((next, transaction)) = next {
                if transaction.kind.is_credit() {
                    expected += i128::from(transaction.amount);
                } else {
                    expected -= i128::from(transaction.amount);
                }
                ledger = next;
            }

            assert_eq!(i128::from(ledger.balance()), expected);
            assert_consistent(&ledger);
        }

        assert!(ledger.is_joined("3"));
        assert_eq!(
            ledger
                .transactions()
                .iter()
                .filter(|transaction| transaction.kind == TransactionKind::EntryFee)
                .count(),
            ledger.participation().len()
        );
    }
}
