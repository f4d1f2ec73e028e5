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

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{STARTING_BONUS, session::SessionError};

/// There is only ever one user per session.
pub const USER_ID: &str = "user_1";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub balance: u64,
    pub joined_at: DateTime<Utc>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> balance: {} joined: {}",
            self.username,
            self.email,
            self.balance,
            self.joined_at.to_rfc3339()
        )
    }
}

/// What the login form collects. The password is accepted but never checked.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub email: String,
}

impl Credentials {
    /// # Errors
    ///
    /// If the username or the email is blank.
    pub fn into_user(self) -> Result<User, SessionError> {
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() {
            return Err(SessionError::MissingUsername);
        }
        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }

        Ok(User {
            id: USER_ID.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            balance: STARTING_BONUS,
            joined_at: Utc::now(),
        })
    }
}
