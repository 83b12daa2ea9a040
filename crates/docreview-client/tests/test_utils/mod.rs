// In-process HTTP stubs for the producer and the approval endpoint
//
// Each connection carries one request and is closed after the response, so
// the stubs only need to understand Content-Length framed bodies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

pub struct Request {
    pub method: String,
    pub path: String,
    pub body: String,
}

async fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        if buf.len() < body_start + content_length {
            continue;
        }

        let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
        return Some(Request {
            method: request_line.next().unwrap_or("").to_string(),
            path: request_line.next().unwrap_or("").to_string(),
            body: String::from_utf8_lossy(&buf[body_start..body_start + content_length])
                .to_string(),
        });
    }
}

async fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Serves named files from a shared map; unknown names are 404
pub async fn file_server(files: Arc<Mutex<HashMap<String, String>>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let files = files.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut stream).await else {
                    return;
                };
                let name = request.path.trim_start_matches('/').to_string();
                let content = files.lock().unwrap().get(&name).cloned();
                match content {
                    Some(text) => respond(&mut stream, "200 OK", "text/plain", &text).await,
                    None => respond(&mut stream, "404 Not Found", "text/plain", "not found").await,
                }
            });
        }
    });

    format!("http://{}/", addr)
}

/// Approval endpoint that records every request and answers with `status`
pub async fn approval_server(status: &'static str) -> (String, mpsc::UnboundedReceiver<Request>) {
    approval_server_with_body(status, r#"{"message":"Changes received"}"#).await
}

pub async fn approval_server_with_body(
    status: &'static str,
    body: &'static str,
) -> (String, mpsc::UnboundedReceiver<Request>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut stream).await else {
                    return;
                };
                let _ = tx.send(request);
                respond(&mut stream, status, "application/json", body).await;
            });
        }
    });

    (format!("http://{}/approve_changes", addr), rx)
}

/// A URL nothing is listening on
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/approve_changes", addr)
}
