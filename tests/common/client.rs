//! Test controller client.
//!
//! Drives the control channel over a real WebSocket and asserts on the
//! JSON replies.

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// A controller connected to the daemon under test.
pub struct ControllerClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl ControllerClient {
    /// Connect and consume the `connected` greeting.
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let (ws, _) = connect_async(format!("ws://{}", addr)).await?;
        let mut client = Self { ws };

        let greeting = client.recv().await?;
        anyhow::ensure!(
            greeting["status"] == "connected",
            "expected connected greeting, got {greeting}"
        );

        Ok(client)
    }

    /// Send raw text on the control channel.
    pub async fn send_raw(&mut self, raw: &str) -> anyhow::Result<()> {
        self.ws.send(Message::Text(raw.to_string())).await?;
        Ok(())
    }

    /// Send a JSON value.
    pub async fn send_json(&mut self, value: &Value) -> anyhow::Result<()> {
        self.send_raw(&value.to_string()).await
    }

    /// Send a start_benchmark request with the given variant bodies.
    pub async fn start(&mut self, option_a: &str, option_b: &str) -> anyhow::Result<()> {
        self.send_json(&json!({
            "type": "start_benchmark",
            "payload": {
                "setup": "const xs = [1, 2, 3];",
                "optionA": option_a,
                "optionB": option_b,
                "teardown": "console.log('done');",
            }
        }))
        .await
    }

    /// Send a stop_benchmark request.
    pub async fn stop(&mut self, session_id: &str) -> anyhow::Result<()> {
        self.send_json(&json!({
            "type": "stop_benchmark",
            "sessionId": session_id,
        }))
        .await
    }

    /// Receive the next JSON reply.
    pub async fn recv(&mut self) -> anyhow::Result<Value> {
        loop {
            let frame = timeout(Duration::from_secs(5), self.ws.next())
                .await?
                .ok_or_else(|| anyhow::anyhow!("control connection closed"))??;
            match frame {
                Message::Text(raw) => return Ok(serde_json::from_str(&raw)?),
                Message::Ping(_) | Message::Pong(_) => continue,
                other => anyhow::bail!("unexpected control frame: {other:?}"),
            }
        }
    }

    /// Receive a reply and assert its `status` field.
    pub async fn expect_status(&mut self, status: &str) -> anyhow::Result<Value> {
        let reply = self.recv().await?;
        anyhow::ensure!(
            reply["status"] == status,
            "expected status {status}, got {reply}"
        );
        Ok(reply)
    }

    /// Receive replies until one carries the given status, returning all
    /// of them in order.
    pub async fn recv_until_status(&mut self, status: &str) -> anyhow::Result<Vec<Value>> {
        let mut replies = Vec::new();
        loop {
            let reply = self.recv().await?;
            let done = reply["status"] == status;
            replies.push(reply);
            if done {
                return Ok(replies);
            }
        }
    }
}
