//! Telemetry push feed transport.
//!
//! The bridge only needs "connect to a URL" and "next text message", so the
//! WebSocket client sits behind two small traits and tests substitute a
//! scripted transport.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::ShellError;

/// Opens push feed connections.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn FeedStream>, ShellError>;
}

/// An open push feed connection.
#[async_trait]
pub trait FeedStream: Send {
    /// Next text payload. `None` once the peer closed the connection.
    async fn next_text(&mut self) -> Option<Result<String, ShellError>>;
}

/// `tokio-tungstenite` implementation of [`FeedTransport`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WsTransport;

#[async_trait]
impl FeedTransport for WsTransport {
    async fn connect(&self, url: &str) -> Result<Box<dyn FeedStream>, ShellError> {
        let (stream, _) = connect_async(url).await.map_err(|e| ShellError::Feed(e.to_string()))?;
        Ok(Box::new(WsStream { stream }))
    }
}

struct WsStream {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FeedStream for WsStream {
    async fn next_text(&mut self) -> Option<Result<String, ShellError>> {
        loop {
            let msg = match self.stream.next().await? {
                Ok(msg) => msg,
                Err(e) => return Some(Err(ShellError::Feed(e.to_string()))),
            };
            match msg {
                Message::Text(text) => return Some(Ok(text.to_string())),
                Message::Binary(bytes) => {
                    return Some(String::from_utf8(bytes.to_vec()).map_err(|e| ShellError::Feed(e.to_string())));
                }
                Message::Close(_) => return None,
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }
}
