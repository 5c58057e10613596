// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport abstraction for the live event channel.
//!
//! The channel only needs two things from its transport: open a connection,
//! and read one text frame at a time until the connection dies. Putting
//! those behind the [`Connector`] and [`Transport`] traits keeps the
//! reconnect state machine testable with an in-memory fake while production
//! uses the WebSocket implementation below.

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

use crate::error::ChannelError;

/// A live, message-oriented connection.
pub trait Transport: Send {
    /// Reads the next text frame.
    ///
    /// Returns `None` when the connection has closed, `Some(Err(_))` on a
    /// transport error (after which the connection is unusable), and
    /// `Some(Ok(text))` for each inbound text frame. Non-text frames are
    /// handled internally and never surface here.
    fn next_frame(&mut self) -> BoxFuture<'_, Option<Result<String, ChannelError>>>;
}

/// Factory for [`Transport`] connections.
///
/// Each call to [`connect`](Connector::connect) opens a fresh connection;
/// the channel calls it once per reconnect attempt.
pub trait Connector: Send + Sync {
    /// Opens a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] when the connection cannot be established.
    fn connect(&self) -> BoxFuture<'_, Result<Box<dyn Transport>, ChannelError>>;
}

/// Validates that a URL can be turned into a WebSocket client request.
///
/// # Errors
///
/// Returns [`ChannelError::InvalidAddress`] for URLs the WebSocket stack
/// cannot construct a request from.
pub fn validate_url(url: &str) -> Result<(), ChannelError> {
    url.into_client_request()
        .map(|_| ())
        .map_err(|e| ChannelError::InvalidAddress(format!("{url}: {e}")))
}

/// WebSocket connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    /// Creates a connector for the given `ws://` or `wss://` URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Returns the URL this connector dials.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for WsConnector {
    fn connect(&self) -> BoxFuture<'_, Result<Box<dyn Transport>, ChannelError>> {
        async move {
            let (stream, response) = connect_async(self.url.as_str()).await?;
            debug!(url = %self.url, status = %response.status(), "websocket connected");
            Ok(Box::new(WsTransport::new(stream)) as Box<dyn Transport>)
        }
        .boxed()
    }
}

/// A connected WebSocket transport.
///
/// Ping frames are answered with pongs; binary and pong frames are ignored.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTransport {
    fn new(stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self { stream }
    }
}

impl Transport for WsTransport {
    fn next_frame(&mut self) -> BoxFuture<'_, Option<Result<String, ChannelError>>> {
        async move {
            loop {
                match self.stream.next().await? {
                    Ok(Message::Text(text)) => return Some(Ok(text)),
                    Ok(Message::Ping(payload)) => {
                        // Keep-alive; a failed pong will surface on the
                        // next read as a transport error.
                        let _ = self.stream.send(Message::Pong(payload)).await;
                    }
                    Ok(Message::Close(frame)) => {
                        debug!(?frame, "websocket closed by server");
                        return None;
                    }
                    Ok(other) => {
                        trace!(kind = %message_kind(&other), "ignoring non-text frame");
                    }
                    Err(e) => return Some(Err(ChannelError::Transport(e))),
                }
            }
        }
        .boxed()
    }
}

fn message_kind(message: &Message) -> &'static str {
    match message {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "frame",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_ws_urls() {
        assert!(validate_url("ws://127.0.0.1:8765/").is_ok());
        assert!(validate_url("wss://hub.example.org:443/").is_ok());
    }

    #[test]
    fn validate_rejects_garbage() {
        assert!(matches!(
            validate_url("not a url"),
            Err(ChannelError::InvalidAddress(_))
        ));
    }

    #[test]
    fn connector_keeps_url() {
        let connector = WsConnector::new("ws://hub:8765/");
        assert_eq!(connector.url(), "ws://hub:8765/");
    }
}
