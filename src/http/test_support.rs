use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Local HTTP/1.1 server answering every request with one fixed response.
/// Aborted on drop.
pub(crate) struct TestServer {
    pub(crate) url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Raw text of every request received so far.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Clone, Copy)]
enum Reply {
    Status(u16, &'static str),
    Stall,
}

pub(crate) async fn spawn_status_server(
    status: u16,
    body: &'static str,
) -> Result<TestServer, String> {
    spawn_server(Reply::Status(status, body)).await
}

/// Accepts connections and reads requests but never answers.
pub(crate) async fn spawn_stalled_server() -> Result<TestServer, String> {
    spawn_server(Reply::Stall).await
}

/// A URL on a port nothing listens on.
pub(crate) async fn unreachable_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("local addr failed: {}", err))?;
    drop(listener);
    Ok(format!("http://{}/post", addr))
}

async fn spawn_server(reply: Reply) -> Result<TestServer, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("local addr failed: {}", err))?;
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let seen = Arc::clone(&seen);
            tokio::spawn(handle_client(stream, reply, seen));
        }
    });

    Ok(TestServer {
        url: format!("http://{}/post", addr),
        requests,
        handle,
    })
}

async fn handle_client(mut stream: TcpStream, reply: Reply, seen: Arc<Mutex<Vec<String>>>) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    if let Ok(mut requests) = seen.lock() {
        requests.push(request);
    }

    match reply {
        Reply::Stall => {
            std::future::pending::<()>().await;
        }
        Reply::Status(status, body) => {
            let reason = http::StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("Unknown");
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            if stream.write_all(response.as_bytes()).await.is_err() {
                return;
            }
            drop(stream.shutdown().await);
        }
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(chunk.get(..read)?);

        let text = String::from_utf8_lossy(&buffer).into_owned();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let body_start = header_end.saturating_add(4);
            let body_len = content_length(text.get(..header_end).unwrap_or_default());
            if buffer.len() >= body_start.saturating_add(body_len) {
                return Some(text);
            }
        }
    }
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
