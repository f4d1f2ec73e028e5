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

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// The tournament ids the current user has joined.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Participation(FxHashSet<String>);

impl Participation {
    #[must_use]
    pub fn is_joined(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Returns false if the id was already present.
    pub(crate) fn insert(&mut self, id: &str) -> bool {
        self.0.insert(id.to_string())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The joined ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.0.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Display for Participation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ids().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stored_once() {
        let mut participation = Participation::default();

        assert!(participation.insert("2"));
        assert!(participation.insert("1"));
        assert!(!participation.insert("2"));

        assert_eq!(participation.len(), 2);
        assert!(participation.is_joined("1"));
        assert!(!participation.is_joined("3"));
        assert_eq!(participation.to_string(), "1 2");
    }
}
