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

#![deny(clippy::expect_used)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

mod command_line;

use std::{
    io::{self, BufRead},
    sync::{
        Arc,
        mpsc::{self, Sender},
    },
    thread,
};

use clap::Parser;
use game_arena::{
    advisory::{Advisory, AdvisoryReply, GeminiClient},
    message::Message,
    session::Session,
    utils,
};
use log::{debug, error, info};

use crate::command_line::Args;

/// Everything the event loop reacts to, in arrival order.
#[derive(Debug)]
enum Event {
    Advisory(AdvisoryReply),
    Eof,
    Line(String),
}

impl From<AdvisoryReply> for Event {
    fn from(reply: AdvisoryReply) -> Self {
        Self::Advisory(reply)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger("game_arena", args.debug, args.systemd);

    if args.man {
        return Args::generate_man_page();
    }

    let config = args.advisory_config();
    if config.api_key.is_none() {
        info!("no API key, tips and support replies will fall back");
    }
    debug!("{config:?}");
    let advisory = Advisory::new(Arc::new(GeminiClient::new(config)?));

    let (tx, rx) = mpsc::channel();
    read_stdin(tx.clone());

    let mut session = Session::default();
    let mut in_flight = 0_usize;
    let mut quitting = false;
    println!("Enter 'list_commands' for a list of commands.");

    for event in rx {
        match event {
            Event::Line(_) if quitting => {}
            Event::Line(line) => {
                let message = match Message::from_line(&line) {
                    Ok(message) => message,
                    Err(error) => {
                        println!("? {error}\n");
                        continue;
                    }
                };

                if message == Message::Quit {
                    quitting = true;
                } else {
                    match session.update(message) {
                        Ok(Some(output)) => println!("= {output}\n"),
                        Ok(None) => {}
                        Err(error) => println!("? {error}\n"),
                    }
                }

                for request in session.take_requests() {
                    debug!("advisory: {request:?}");
                    advisory.dispatch(request, tx.clone());
                    in_flight += 1;
                }
            }
            Event::Advisory(reply) => {
                in_flight = in_flight.saturating_sub(1);
                let support = matches!(reply, AdvisoryReply::Support { .. });

                if session.receive(reply) {
                    print_reply(&mut session, support);
                }
            }
            Event::Eof => quitting = true,
        }

        if quitting {
            if in_flight == 0 {
                break;
            }
            debug!("waiting for {in_flight} advisory replies");
        }
    }

    Ok(())
}

fn print_reply(session: &mut Session, support: bool) {
    if support {
        if let Some(message) = session.chat().last() {
            println!("= {message}\n");
        }
    } else {
        match session.update(Message::Strategies) {
            Ok(Some(tips)) => println!("= {tips}\n"),
            Ok(None) => {}
            Err(error) => error!("strategies: {error}"),
        }
    }
}

fn read_stdin(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();

        for line in stdin.lock().lines() {
            let event = match line {
                Ok(line) => Event::Line(line),
                Err(error) => {
                    error!("stdin: {error}");
                    Event::Eof
                }
            };
            let eof = matches!(event, Event::Eof);

            if tx.send(event).is_err() || eof {
                return;
            }
        }

        let _ = tx.send(Event::Eof);
    });
}
