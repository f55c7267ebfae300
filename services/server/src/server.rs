//! TCP accept loop and per-connection handling
//!
//! One tokio task per connection; each received datagram-style read is
//! expected to hold one JSON request and gets one JSON response back.
//! The exchange sits behind a coarse read-write lock: submissions and
//! cancels take the write half, quotes and history take the read half.

use anyhow::Context;
use matching_engine::Exchange;
use parking_lot::RwLock;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

use crate::protocol::{dispatch, Request};

const READ_BUFFER_SIZE: usize = 4096;

/// Shared server state
#[derive(Clone)]
pub struct Server {
    exchange: Arc<RwLock<Exchange>>,
}

impl Server {
    pub fn new(allowed_tickers: Vec<String>) -> Self {
        Self {
            exchange: Arc::new(RwLock::new(Exchange::new(allowed_tickers))),
        }
    }

    /// Bind and serve until the process is stopped
    pub async fn run(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(%addr, "server listening");

        loop {
            let (socket, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    error!(%err, "accept failed");
                    continue;
                }
            };

            let server = self.clone();
            tokio::spawn(async move {
                debug!(%peer, "client connected");
                if let Err(err) = server.handle_client(socket).await {
                    debug!(%peer, %err, "connection closed with error");
                }
                debug!(%peer, "client disconnected");
            });
        }
    }

    async fn handle_client(&self, mut socket: TcpStream) -> anyhow::Result<()> {
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let received = socket.read(&mut buffer).await?;
            if received == 0 {
                return Ok(());
            }

            let response = match serde_json::from_slice::<Request>(&buffer[..received]) {
                Ok(request) => {
                    debug!(?request, "handling request");
                    dispatch(&self.exchange, request)
                }
                Err(err) => json!({ "error": format!("malformed request: {err}") }),
            };

            let payload = serde_json::to_vec(&response)?;
            socket.write_all(&payload).await?;
        }
    }
}
