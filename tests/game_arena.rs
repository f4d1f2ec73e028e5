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

#![allow(clippy::unwrap_used)]

use std::{
    io::{BufRead, BufReader, Read, Write},
    net::TcpListener,
    process::{Command, Stdio},
    sync::Arc,
    thread::{self, JoinHandle},
};

use game_arena::{
    advisory::{Advisory, AdvisoryReply, AdvisoryRequest, GeminiClient, SUPPORT_FALLBACK},
    config::AdvisoryConfig,
    session::Session,
    transaction::{PaymentMethod, TransactionKind, TransactionStatus},
    user::Credentials,
};

/// Answers exactly one HTTP request and hands back what it received.
fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request = String::new();
        let mut content_length = 0;

        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            request.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }

        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();
        request.push_str(&String::from_utf8(request_body).unwrap());

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        request
    });

    (format!("http://{address}/v1beta"), handle)
}

fn advisory(endpoint: String) -> Advisory {
    let http = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    let client = GeminiClient::with_client(
        AdvisoryConfig {
            api_key: Some("test-key".to_string()),
            endpoint,
            ..AdvisoryConfig::default()
        },
        http,
    );

    Advisory::new(Arc::new(client))
}

fn candidate(text: &str) -> String {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
    })
    .to_string()
}

fn logged_in() -> Session {
    let mut session = Session::default();
    session
        .login(Credentials {
            username: "ProGamer99".to_string(),
            email: "name@example.com".to_string(),
        })
        .unwrap();
    session
}

#[test]
fn strategies_over_http() {
    let tips = r#"[{"title": "Drop Late", "description": "Avoid the hot zones."},
                   {"title": "Hold Height", "description": "Fight from above."}]"#;
    let (endpoint, server) = serve_once("200 OK", candidate(tips));

    let strategies = advisory(endpoint).fetch_strategies("Free Fire");
    let request = server.join().unwrap();

    assert_eq!(strategies.len(), 2);
    assert_eq!(strategies[1].title, "Hold Height");
    assert!(request.starts_with("POST /v1beta/models/gemini-3-flash-preview:generateContent "));
    assert!(request.to_lowercase().contains("x-goog-api-key: test-key"));
    assert!(request.contains("\"responseMimeType\":\"application/json\""));
    assert!(request.contains("3 quick winning strategies for Free Fire tournaments"));
}

#[test]
fn support_over_http() {
    let (endpoint, server) = serve_once("200 OK", candidate("Deposits arrive instantly."));

    let reply = advisory(endpoint).fetch_support_reply("When do deposits arrive?");
    let request = server.join().unwrap();

    assert_eq!(reply, "Deposits arrive instantly.");
    assert!(!request.contains("responseMimeType"));
}

#[test]
fn server_errors_fall_back() {
    let (endpoint, server) = serve_once(
        "500 Internal Server Error",
        r#"{"error": {"message": "boom"}}"#.to_string(),
    );

    assert_eq!(
        advisory(endpoint).fetch_support_reply("hello?"),
        SUPPORT_FALLBACK
    );
    server.join().unwrap();
}

#[test]
fn malformed_responses_are_empty() {
    let (endpoint, server) = serve_once("200 OK", "<html>not json</html>".to_string());
    assert!(advisory(endpoint).fetch_strategies("BGMI").is_empty());
    server.join().unwrap();

    let (endpoint, server) = serve_once("200 OK", candidate("Here are some tips: be brave."));
    assert!(advisory(endpoint).fetch_strategies("BGMI").is_empty());
    server.join().unwrap();
}

#[test]
fn dispatched_replies_reach_the_session() {
    let (endpoint, server) = serve_once("200 OK", candidate("Room IDs come 15 minutes early."));
    let advisory = advisory(endpoint);
    let mut session = logged_in();
    session.take_requests();

    assert!(session.ask_support("When do I get the room id?").unwrap());
    let (tx, rx) = std::sync::mpsc::channel::<AdvisoryReply>();
    for request in session.take_requests() {
        assert!(matches!(request, AdvisoryRequest::Support { .. }));
        advisory.dispatch(request, tx.clone()).join().unwrap();
    }
    server.join().unwrap();

    assert!(session.receive(rx.recv().unwrap()));
    assert_eq!(
        session.chat().last().map(|message| message.text.as_str()),
        Some("Room IDs come 15 minutes early.")
    );
}

#[test]
fn deposit_then_join() {
    let mut session = logged_in();

    let deposit = session
        .deposit(50, PaymentMethod::Bikash, "01711111111")
        .unwrap();
    assert_eq!(deposit.kind, TransactionKind::Deposit);
    assert_eq!(deposit.amount, 50);
    assert_eq!(deposit.status, TransactionStatus::Success);
    assert_eq!(session.ledger().unwrap().balance(), 150);

    let entry_fee = session.join("1").unwrap();
    assert_eq!(entry_fee.kind, TransactionKind::EntryFee);
    assert_eq!(entry_fee.amount, 50);
    assert_eq!(session.ledger().unwrap().balance(), 100);
    assert!(session.is_joined("1"));

    assert!(session.withdraw(200, PaymentMethod::Nagad, "01711111111").is_err());
    let ledger = session.ledger().unwrap();
    assert_eq!(ledger.balance(), 100);
    assert_eq!(ledger.transactions().len(), 2);
    assert_eq!(ledger.derived_balance(), Some(100));
}

#[test]
fn the_catalog_is_never_mutated() {
    let mut session = logged_in();
    let before = session.catalog().clone();

    session.join("2").unwrap();
    assert_eq!(session.catalog(), &before);
    assert_eq!(session.catalog().get("2").map(|t| t.participants), Some(12));
}

#[test]
fn quit_waits_for_replies_in_flight() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_game-arena"))
        .env_remove("API_KEY")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"login ProGamer99 name@example.com\nsupport Is room #3 open?\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("= Welcome Back, ProGamer99!"));
    assert!(stdout.contains(&format!("= ArenaBot: {SUPPORT_FALLBACK}")));
    assert!(stdout.contains("= AI PRO TIPS: none right now."));
}
