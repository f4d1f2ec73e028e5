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

use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hi! I am ArenaBot. How can I help you today? You can ask about \
                            deposits, tournament rules, or how to join a match.";
pub const EMPTY_REPLY: &str = "Sorry, I missed that.";

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ChatRole {
    User,
    Bot,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "you"),
            Self::Bot => write!(f, "ArenaBot"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.text)
    }
}

/// The support desk transcript.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SupportChat {
    pub messages: Vec<ChatMessage>,
    pub waiting: usize,
}

impl SupportChat {
    /// Records the question and returns it trimmed, or `None` if it is blank.
    pub fn ask(&mut self, question: &str) -> Option<String> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: question.to_string(),
        });
        self.waiting += 1;

        Some(question.to_string())
    }

    pub fn reply(&mut self, text: &str) {
        let text = if text.trim().is_empty() {
            EMPTY_REPLY
        } else {
            text
        };

        self.messages.push(ChatMessage {
            role: ChatRole::Bot,
            text: text.to_string(),
        });
        self.waiting = self.waiting.saturating_sub(1);
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

impl Default for SupportChat {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Bot,
                text: GREETING.to_string(),
            }],
            waiting: 0,
        }
    }
}

impl fmt::Display for SupportChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }
        if self.waiting > 0 {
            writeln!(f, "ArenaBot is typing ...")?;
        }

        Ok(())
    }
}
