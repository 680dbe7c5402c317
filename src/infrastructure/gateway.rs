//! WhatsApp gateway client.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{Messenger, ServiceError};

pub struct WaGateway {
    client: reqwest::Client,
    url: String,
    api_key: String,
    sender: String,
}

impl WaGateway {
    pub fn new(url: &str, api_key: &str, sender: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            url: url.to_string(),
            api_key: api_key.to_string(),
            sender: sender.to_string(),
        }
    }
}

#[async_trait]
impl Messenger for WaGateway {
    async fn send(&self, address: &str, body: &str) -> Result<(), ServiceError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&json!({
                "api_key": self.api_key,
                "sender": self.sender,
                "number": address,
                "message": body,
            }))
            .send()
            .await
            .map_err(|e| ServiceError::Messaging(format!("send to {}: {}", address, e)))?;

        if !resp.status().is_success() {
            return Err(ServiceError::Messaging(format!(
                "send to {}: status {}",
                address,
                resp.status()
            )));
        }
        Ok(())
    }
}
