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

use std::io::Write as _;

use clap::{CommandFactory, Parser};
use game_arena::{
    COPYRIGHT, LONG_VERSION,
    config::{AdvisoryConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL},
};

/// GameArena Pro
///
/// Join mock tournaments, move money through a mock wallet and talk to the
/// support bot. Reads one command per line from stdin.
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about = "GameArena Pro")]
pub(crate) struct Args {
    /// API key for the text generation service
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the text generation service
    #[arg(default_value = DEFAULT_ENDPOINT, long)]
    pub endpoint: String,

    /// Model used for tips and support replies
    #[arg(default_value = DEFAULT_MODEL, long)]
    pub model: String,

    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,

    /// Whether the application is being run by systemd
    #[arg(long)]
    pub systemd: bool,

    /// Build the manpage
    #[arg(long)]
    pub man: bool,
}

impl Args {
    pub(crate) fn advisory_config(&self) -> AdvisoryConfig {
        AdvisoryConfig {
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
        }
    }

    pub(crate) fn generate_man_page() -> anyhow::Result<()> {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Self::command().name("game-arena").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2026-10-17");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        std::fs::write("game-arena.1", buffer)?;
        Ok(())
    }
}
