//! Minimal scripted HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table. Each route answers with a status, optional
//! Content-Type/Location headers and a body; an optional delay before the
//! response simulates a stalled server. Unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
    /// Sleep this long before writing anything (stalls the client's read).
    pub delay: Option<Duration>,
    /// Echo the request's User-Agent header as the body.
    pub echo_user_agent: bool,
}

impl StubResponse {
    pub fn text(body: &str) -> Self {
        Self {
            status: 200,
            content_type: Some("text/plain".to_string()),
            body: body.as_bytes().to_vec(),
            ..Default::default()
        }
    }

    pub fn bytes(body: Vec<u8>, content_type: &str) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body,
            ..Default::default()
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            status: 303,
            location: Some(to.to_string()),
            ..Default::default()
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/plain".to_string()),
            ..Default::default()
        }
    }

    pub fn delayed(body: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::text(body)
        }
    }

    pub fn echo_user_agent() -> Self {
        Self {
            echo_user_agent: true,
            ..Self::text("")
        }
    }
}

/// Starts a server on an ephemeral port serving `routes` (keys are request
/// paths like "/final"). Returns the base URL, e.g. "http://127.0.0.1:12345".
/// The server runs until the process exits.
pub fn start(routes: HashMap<String, StubResponse>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, StubResponse>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (path, user_agent) = parse_request(request);

    let Some(route) = routes.get(path) else {
        let _ = stream
            .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    };

    if let Some(delay) = route.delay {
        thread::sleep(delay);
    }

    let body: Vec<u8> = if route.echo_user_agent {
        user_agent.into_bytes()
    } else {
        route.body.clone()
    };

    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        route.status,
        reason_phrase(route.status)
    );
    if let Some(content_type) = &route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    if let Some(location) = &route.location {
        head.push_str(&format!("Location: {}\r\n", location));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    ));
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

/// Returns (request path, User-Agent header value).
fn parse_request(request: &str) -> (&str, String) {
    let mut lines = request.lines();
    let path = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let mut user_agent = String::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = value.trim().to_string();
            }
        }
    }
    (path, user_agent)
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        303 => "See Other",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
