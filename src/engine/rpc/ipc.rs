// Pairswap Engine: IPC JSON-RPC Transport (unix domain socket)
//
// Nodes write responses back-to-back without framing, so the read side parses
// the buffer as a stream of JSON values and keeps any partial tail for the
// next read.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::Mutex;

use super::{response_id, Transport};
use crate::atoms::error::{PairswapError, PairswapResult};

struct IpcConnection {
    stream: UnixStream,
    buffer: Vec<u8>,
}

pub(crate) struct IpcTransport {
    path: PathBuf,
    conn: Mutex<IpcConnection>,
}

impl IpcTransport {
    pub(crate) async fn connect(path: &Path) -> PairswapResult<Self> {
        let stream = UnixStream::connect(path).await.map_err(|e| PairswapError::Connectivity {
            endpoint: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("[rpc] IPC connected to {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(IpcConnection { stream, buffer: Vec::new() }),
        })
    }
}

/// Pull complete JSON values off the front of `buffer`, returning the one whose
/// id matches. Consumed bytes are drained; an incomplete tail is kept.
fn take_response(buffer: &mut Vec<u8>, id: u64) -> PairswapResult<Option<Value>> {
    let mut consumed = 0;
    let mut found = None;
    {
        let mut values = serde_json::Deserializer::from_slice(buffer.as_slice()).into_iter::<Value>();
        loop {
            match values.next() {
                Some(Ok(value)) => {
                    consumed = values.byte_offset();
                    if response_id(&value) == Some(id) {
                        found = Some(value);
                        break;
                    }
                }
                Some(Err(e)) if e.is_eof() => break,
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }
    }
    buffer.drain(..consumed);
    Ok(found)
}

#[async_trait]
impl Transport for IpcTransport {
    async fn round_trip(&self, id: u64, payload: &Value) -> PairswapResult<Value> {
        let mut conn = self.conn.lock().await;
        let body = serde_json::to_vec(payload)?;
        conn.stream.write_all(&body).await?;

        let mut chunk = [0u8; 8192];
        loop {
            if let Some(response) = take_response(&mut conn.buffer, id)? {
                return Ok(response);
            }
            let n = conn.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(PairswapError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("IPC socket {} closed", self.path.display()),
                )));
            }
            conn.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}
