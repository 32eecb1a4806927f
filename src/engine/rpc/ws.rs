// Pairswap Engine: WebSocket JSON-RPC Transport
//
// One request in flight at a time; frames that are not the awaited response
// (subscription notifications, stale replies) are skipped.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use log::debug;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream};

use super::{response_id, Transport};
use crate::atoms::error::{PairswapError, PairswapResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub(crate) struct WsTransport {
    url: String,
    stream: Mutex<WsStream>,
}

impl WsTransport {
    pub(crate) async fn connect(url: &str) -> PairswapResult<Self> {
        let (stream, _) = connect_async(url).await.map_err(|e| PairswapError::Connectivity {
            endpoint: url.to_string(),
            message: e.to_string(),
        })?;
        debug!("[rpc] WebSocket connected to {}", url);
        Ok(Self { url: url.to_string(), stream: Mutex::new(stream) })
    }
}

fn ws_error(url: &str, e: impl std::fmt::Display) -> PairswapError {
    PairswapError::WebSocket(format!("{}: {}", url, e))
}

#[async_trait]
impl Transport for WsTransport {
    async fn round_trip(&self, id: u64, payload: &Value) -> PairswapResult<Value> {
        let mut ws = self.stream.lock().await;
        ws.send(WsMessage::Text(payload.to_string()))
            .await
            .map_err(|e| ws_error(&self.url, e))?;

        loop {
            let frame = match ws.next().await {
                Some(Ok(WsMessage::Text(text))) => text.into_bytes(),
                Some(Ok(WsMessage::Binary(bytes))) => bytes,
                Some(Ok(WsMessage::Close(_))) | None => {
                    return Err(ws_error(&self.url, "connection closed"));
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(ws_error(&self.url, e)),
            };
            let response: Value = serde_json::from_slice(&frame)?;
            if response_id(&response) == Some(id) {
                return Ok(response);
            }
        }
    }
}
