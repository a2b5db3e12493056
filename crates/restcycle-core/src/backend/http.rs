//! HTTP client for the cycle-tracking backend.
//!
//! Owns a small current-thread tokio runtime so one-shot CLI commands and
//! the watch loop can call it from synchronous code without an ambient
//! executor.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::runtime::Runtime;
use url::Url;

use super::{RestStarted, StateBackend, UserCycleState};
use crate::error::{BackendError, ConfigError, CoreError};

pub struct HttpBackend {
    base: Url,
    client: Client,
    runtime: Runtime,
}

impl HttpBackend {
    /// Build a client for the given base URL (e.g. `http://tracker:5000`).
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let mut base = Url::parse(base_url).map_err(|e| {
            ConfigError::InvalidValue {
                key: "backend.base_url".into(),
                message: format!("'{base_url}': {e}"),
            }
        })?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            base,
            client: Client::new(),
            runtime,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path)
            .map_err(|e| BackendError::Network(format!("bad endpoint '{path}': {e}")))
    }

    /// Read a response as JSON, mapping HTTP failures and `error` bodies
    /// to `Rejected` and everything that never answered to `Network`.
    fn read_json(&self, resp: reqwest::Response) -> Result<Value, BackendError> {
        let status = resp.status();
        let body: Value = self
            .runtime
            .block_on(resp.json())
            .map_err(|e| BackendError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::Rejected(error_message(&body, status)));
        }
        Ok(body)
    }
}

impl StateBackend for HttpBackend {
    fn fetch_state(&self, username: &str) -> Result<UserCycleState, BackendError> {
        let url = self.endpoint(&format!(
            "get_user_state/{}",
            urlencoding::encode(username)
        ))?;
        let resp = self
            .runtime
            .block_on(self.client.get(url).send())
            .map_err(BackendError::from)?;
        let body = self.read_json(resp)?;
        if let Some(err) = body.get("error").and_then(Value::as_str) {
            return Err(BackendError::Rejected(err.to_string()));
        }
        serde_json::from_value(body).map_err(|e| BackendError::Network(e.to_string()))
    }

    fn start_rest(&self, username: &str) -> Result<RestStarted, BackendError> {
        let url = self.endpoint("start_rest")?;
        let resp = self
            .runtime
            .block_on(self.client.post(url).form(&[("username", username)]).send())
            .map_err(BackendError::from)?;
        let status = resp.status();
        let body = self.read_json(resp)?;
        if body.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(BackendError::Rejected(error_message(&body, status)));
        }
        serde_json::from_value(body).map_err(|e| BackendError::Network(e.to_string()))
    }

    fn server_time(&self) -> Result<i64, BackendError> {
        let url = self.endpoint("get_server_time")?;
        let resp = self
            .runtime
            .block_on(self.client.get(url).send())
            .map_err(BackendError::from)?;
        let body = self.read_json(resp)?;
        body.get("timestamp")
            .and_then(Value::as_f64)
            .map(|t| t as i64)
            .ok_or_else(|| BackendError::Network("missing timestamp in response".into()))
    }
}

fn error_message(body: &Value, status: StatusCode) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
