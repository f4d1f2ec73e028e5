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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    EntryFee,
    Winnings,
}

impl TransactionKind {
    /// Deposits and winnings add to the balance, everything else takes away.
    #[must_use]
    pub fn is_credit(self) -> bool {
        match self {
            Self::Deposit | Self::Winnings => true,
            Self::Withdrawal | Self::EntryFee => false,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "Deposit"),
            Self::Withdrawal => write!(f, "Withdrawal"),
            Self::EntryFee => write!(f, "Entry Fee"),
            Self::Winnings => write!(f, "Winnings"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PaymentMethod {
    Bikash,
    Nagad,
    Wallet,
}

impl PaymentMethod {
    /// Only the mobile wallets move money in and out; `Wallet` is the
    /// in-app balance.
    #[must_use]
    pub fn is_external(self) -> bool {
        matches!(self, Self::Bikash | Self::Nagad)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bikash => write!(f, "Bikash"),
            Self::Nagad => write!(f, "Nagad"),
            Self::Wallet => write!(f, "Wallet Balance"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        let string = string.to_lowercase();

        match string.as_str() {
            "bikash" | "bkash" => Ok(Self::Bikash),
            "nagad" => Ok(Self::Nagad),
            "wallet" => Ok(Self::Wallet),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a PaymentMethod!"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum TransactionStatus {
    Pending,
    #[default]
    Success,
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// One balance-affecting event. Transactions are appended and never changed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: u64,
    pub method: Option<PaymentMethod>,
    pub account_number: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.kind.is_credit() { '+' } else { '-' };
        let method = self
            .method
            .map_or_else(|| "Internal".to_string(), |method| method.to_string());

        write!(
            f,
            "{} {} {sign}{} {method}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            self.amount,
        )?;

        if let Some(account_number) = &self.account_number {
            write!(f, " ({account_number})")?;
        }

        write!(f, " {} [{}]", self.status, self.id)
    }
}
