//! Minimal HTTP/1.1 server standing in for a validator in integration tests.
//!
//! Answers every request with one canned status and JSON body, optionally
//! after a delay, and records each request target (path + query).

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub status: u16,
    pub body: String,
    /// Sleep before answering (simulates a validator that hangs).
    pub delay: Duration,
}

impl ServerOptions {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }
}

pub struct ValidatorServer {
    pub base_url: String,
    /// `host:port` the server listens on.
    pub authority: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ValidatorServer {
    /// Request targets seen so far, e.g. `/api/config/countries?target=v1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(opts: ServerOptions) -> ValidatorServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = opts.clone();
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &opts, &seen));
        }
    });
    ValidatorServer {
        base_url: format!("http://127.0.0.1:{port}"),
        authority: format!("127.0.0.1:{port}"),
        requests,
    }
}

/// Returns a URL on a port nothing listens on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn handle(mut stream: std::net::TcpStream, opts: &ServerOptions, seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    if let Some(target) = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
    {
        seen.lock().unwrap().push(target.to_string());
    }

    if !opts.delay.is_zero() {
        thread::sleep(opts.delay);
    }

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        opts.status,
        reason(opts.status),
        opts.body.len(),
        opts.body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
