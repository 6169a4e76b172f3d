//! TCP debug server
//!
//! One JSON command per line in, one JSON response per line out.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::protocol::{DebugCommand, DebugResponse};

/// Trait that the application implements to handle debug commands
pub trait DebugHandler: Send + Sync + 'static {
    fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse;
}

/// Debug server handle - keep this alive to keep the server running
pub struct DebugServer {
    local_addr: Option<SocketAddr>,
    _handle: tokio::task::JoinHandle<()>,
}

impl DebugServer {
    /// Start the debug server on `127.0.0.1:port`.
    /// Returns immediately -- server runs in background. Bind failures are
    /// logged and leave the server inert.
    pub fn start(handler: Arc<Mutex<dyn DebugHandler>>, port: u16) -> Self {
        let handle = tokio::spawn(async move {
            let addr = format!("127.0.0.1:{}", port);
            let listener = match TcpListener::bind(&addr).await {
                Ok(l) => {
                    log::info!("Debug server listening on {}", addr);
                    l
                }
                Err(e) => {
                    log::error!("Failed to bind debug server on {}: {}", addr, e);
                    return;
                }
            };
            accept_loop(listener, handler).await;
        });

        Self {
            local_addr: None,
            _handle: handle,
        }
    }

    /// Bind first, then serve. Port 0 picks a free port, reported by
    /// [`local_addr`](Self::local_addr).
    pub async fn bind(
        handler: Arc<Mutex<dyn DebugHandler>>,
        addr: &str,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        log::info!("Debug server listening on {}", local_addr);
        let handle = tokio::spawn(accept_loop(listener, handler));
        Ok(Self {
            local_addr: Some(local_addr),
            _handle: handle,
        })
    }

    /// Bound address, when known.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

async fn accept_loop(listener: TcpListener, handler: Arc<Mutex<dyn DebugHandler>>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                log::info!("Debug client connected from {}", peer);
                let handler = handler.clone();
                tokio::spawn(async move {
                    handle_connection(stream, handler).await;
                    log::info!("Debug client disconnected: {}", peer);
                });
            }
            Err(e) => {
                log::error!("Debug server accept error: {}", e);
            }
        }
    }
}

/// Decode one request line, run it, and encode the response line.
pub async fn respond(line: &str, handler: &Mutex<dyn DebugHandler>) -> String {
    let response = match serde_json::from_str::<DebugCommand>(line) {
        Ok(cmd) => {
            log::debug!("Debug command: {:?}", cmd);
            let mut h = handler.lock().await;
            h.handle_command(cmd)
        }
        Err(e) => DebugResponse::error(format!("Invalid command JSON: {}", e)),
    };

    let mut json = serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            "{{\"status\":\"error\",\"message\":\"Serialize error: {}\"}}",
            e
        )
    });
    json.push('\n');
    json
}

async fn handle_connection(stream: TcpStream, handler: Arc<Mutex<dyn DebugHandler>>) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let resp = respond(trimmed, &handler).await;

                if let Err(e) = writer.write_all(resp.as_bytes()).await {
                    log::error!("Debug server write error: {}", e);
                    break;
                }
                if let Err(e) = writer.flush().await {
                    log::error!("Debug server flush error: {}", e);
                    break;
                }
            }
            Err(e) => {
                log::error!("Debug server read error: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ResponseData;

    struct Toggler {
        is_day: bool,
    }

    impl DebugHandler for Toggler {
        fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse {
            match cmd {
                DebugCommand::Ping => DebugResponse::pong(),
                DebugCommand::ToggleDayNight => {
                    self.is_day = !self.is_day;
                    DebugResponse::updated(format!("is_day={}", self.is_day))
                }
                _ => DebugResponse::error("unsupported"),
            }
        }
    }

    #[tokio::test]
    async fn test_respond_dispatches() {
        let handler: Arc<Mutex<dyn DebugHandler>> = Arc::new(Mutex::new(Toggler { is_day: true }));
        let resp = respond(r#"{"cmd":"ToggleDayNight"}"#, &handler).await;
        assert!(resp.ends_with('\n'));
        let parsed: DebugResponse = serde_json::from_str(resp.trim()).unwrap();
        match parsed {
            DebugResponse::Ok {
                data: ResponseData::ParamsUpdated { description },
            } => assert_eq!(description, "is_day=false"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_respond_rejects_bad_json() {
        let handler: Arc<Mutex<dyn DebugHandler>> = Arc::new(Mutex::new(Toggler { is_day: true }));
        let resp = respond("not json", &handler).await;
        assert!(resp.contains("\"status\":\"error\""));
    }

    #[tokio::test]
    async fn test_round_trip_over_tcp() {
        let handler: Arc<Mutex<dyn DebugHandler>> = Arc::new(Mutex::new(Toggler { is_day: true }));
        let server = DebugServer::bind(handler, "127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        writer.write_all(b"{\"cmd\":\"Ping\"}\n").await.unwrap();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert!(line.contains("pong"));
    }
}
