// Pairswap Engine: HTTP JSON-RPC Transport

use async_trait::async_trait;
use serde_json::Value;

use super::Transport;
use crate::atoms::constants::HTTP_REQUEST_TIMEOUT;
use crate::atoms::error::PairswapResult;

pub(crate) struct HttpTransport {
    url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub(crate) fn new(url: &str) -> PairswapResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { url: url.to_string(), client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, _id: u64, payload: &Value) -> PairswapResult<Value> {
        let resp = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}
