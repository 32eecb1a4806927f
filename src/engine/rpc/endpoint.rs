// Pairswap Engine: Provider Endpoints
// Picks the JSON-RPC transport from the endpoint string alone, before any
// connection is attempted.

use std::fmt;
use std::path::PathBuf;

use crate::atoms::error::{PairswapError, PairswapResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `https://…`
    Http(String),
    /// `wss://…`
    WebSocket(String),
    /// Absolute path to a node's IPC socket.
    Ipc(PathBuf),
}

impl Endpoint {
    pub fn parse(provider: &str) -> PairswapResult<Self> {
        let provider = provider.trim();
        if provider.starts_with("https://") {
            Ok(Endpoint::Http(provider.to_string()))
        } else if provider.starts_with("wss://") {
            Ok(Endpoint::WebSocket(provider.to_string()))
        } else if provider.starts_with('/') {
            Ok(Endpoint::Ipc(PathBuf::from(provider)))
        } else {
            Err(PairswapError::config(format!("Unknown provider type '{}'", provider)))
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Http(url) | Endpoint::WebSocket(url) => f.write_str(url),
            Endpoint::Ipc(path) => write!(f, "{}", path.display()),
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = PairswapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::parse(s)
    }
}
