//! Webhook transport -- POST the alert as JSON to a configured URL.
//!
//! Stands in for the out-of-band push channels of the dashboard: anything
//! that accepts a JSON POST (chat webhook, relay, pager bridge) can
//! receive the alert.

use reqwest::Client;
use serde_json::json;
use tokio::runtime::Runtime;

use super::{PresentError, Presenter};

pub struct WebhookPresenter {
    url: String,
    client: Client,
    runtime: Runtime,
}

impl WebhookPresenter {
    pub fn new(url: impl Into<String>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            url: url.into(),
            client: Client::new(),
            runtime,
        })
    }
}

impl Presenter for WebhookPresenter {
    fn name(&self) -> &str {
        "webhook"
    }

    fn available(&self) -> bool {
        !self.url.is_empty()
    }

    fn present(&self, title: &str, body: &str, require_ack: bool) -> Result<(), PresentError> {
        if self.url.is_empty() {
            return Err(PresentError::Unavailable("no webhook URL configured".into()));
        }
        let payload = json!({
            "title": title,
            "body": body,
            "require_ack": require_ack,
        });
        let resp = self
            .runtime
            .block_on(self.client.post(&self.url).json(&payload).send())
            .map_err(|e| PresentError::Failed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(PresentError::Failed(format!("HTTP {}", resp.status())));
        }
        Ok(())
    }
}
