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

use crate::game_type::{GameFilter, GameType};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum TournamentStatus {
    #[default]
    Open,
    Ongoing,
    Completed,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Ongoing => write!(f, "Ongoing"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for TournamentStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "Open" => Ok(Self::Open),
            "Ongoing" => Ok(Self::Ongoing),
            "Completed" => Ok(Self::Completed),
            _ => Err(anyhow::Error::msg(format!(
                "invalid tournament status: {value}"
            ))),
        }
    }
}

/// A catalog entry. Entries are never mutated: joining does not change
/// `participants`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tournament {
    pub id: String,
    pub title: String,
    pub game: GameType,
    pub entry_fee: u64,
    pub prize_pool: u64,
    pub start_time: String,
    pub participants: u32,
    pub max_participants: u32,
    pub status: TournamentStatus,
    pub image: String,
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | fee: {} | prize: {} | {}/{} | {} | {}",
            self.id,
            self.title,
            self.game,
            self.entry_fee,
            self.prize_pool,
            self.participants,
            self.max_participants,
            self.status,
            self.start_time,
        )
    }
}

/// A placing in a finished tournament.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchResult {
    pub id: String,
    pub tournament_id: String,
    pub rank: u32,
    pub player: String,
    pub winnings: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Catalog(pub Vec<Tournament>);

impl Catalog {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Tournament> {
        self.0.iter().find(|tournament| tournament.id == id)
    }

    pub fn filtered(&self, filter: GameFilter) -> impl Iterator<Item = &Tournament> {
        self.0
            .iter()
            .filter(move |tournament| filter.matches(tournament.game))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self(vec![
            mock(
                "1",
                "Free Fire Elite Squad",
                GameType::FreeFire,
                (50, 5_000),
                "2023-11-20T18:00:00Z",
                (45, 100),
                "https://picsum.photos/seed/ff1/800/400",
            ),
            mock(
                "2",
                "Ludo King Masters",
                GameType::Ludo,
                (20, 1_000),
                "2023-11-21T14:00:00Z",
                (12, 32),
                "https://picsum.photos/seed/ludo1/800/400",
            ),
            mock(
                "3",
                "Ludo Weekend Blitz",
                GameType::Ludo,
                (10, 400),
                "2023-11-22T10:00:00Z",
                (8, 16),
                "https://picsum.photos/seed/ludo2/800/400",
            ),
            mock(
                "4",
                "FF Pro League - Night",
                GameType::FreeFire,
                (100, 15_000),
                "2023-11-20T21:00:00Z",
                (90, 100),
                "https://picsum.photos/seed/ff2/800/400",
            ),
        ])
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tournament in &self.0 {
            writeln!(f, "{tournament}")?;
        }

        Ok(())
    }
}

fn mock(
    id: &str,
    title: &str,
    game: GameType,
    (entry_fee, prize_pool): (u64, u64),
    start_time: &str,
    (participants, max_participants): (u32, u32),
    image: &str,
) -> Tournament {
    Tournament {
        id: id.to_string(),
        title: title.to_string(),
        game,
        entry_fee,
        prize_pool,
        start_time: start_time.to_string(),
        participants,
        max_participants,
        status: TournamentStatus::Open,
        image: image.to_string(),
    }
}
