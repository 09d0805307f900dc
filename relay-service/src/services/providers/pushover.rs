use super::{ProviderError, ProviderResponse, PushMessage, PushProvider};
use crate::config::PushoverConfig;
use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

const MESSAGES_PATH: &str = "1/messages.json";

pub struct PushoverProvider {
    config: PushoverConfig,
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Serialize)]
struct PushoverRequest<'a> {
    token: &'a str,
    user: &'a str,
    title: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<i8>,
}

#[derive(Debug, Deserialize)]
struct PushoverResponse {
    status: i64,
    #[serde(default)]
    request: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

impl PushoverProvider {
    pub fn new(config: PushoverConfig, client: Client) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(&format!(
            "{}/{}",
            config.api_url.trim_end_matches('/'),
            MESSAGES_PATH
        ))
        .map_err(|e| {
            ProviderError::Configuration(format!(
                "Invalid Pushover API URL '{}': {}",
                config.api_url, e
            ))
        })?;

        Ok(Self {
            config,
            client,
            endpoint,
        })
    }

    fn build_request<'a>(&'a self, push: &'a PushMessage) -> PushoverRequest<'a> {
        PushoverRequest {
            token: self.config.app_token.expose_secret(),
            user: self.config.user_key.expose_secret(),
            title: &push.title,
            message: &push.message,
            url: push.url.as_deref(),
            device: self.config.device.as_deref(),
            sound: self.config.sound.as_deref(),
            priority: self.config.priority,
        }
    }
}

#[async_trait]
impl PushProvider for PushoverProvider {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&self.build_request(push))
            .send()
            .await
            .map_err(|e| {
                ProviderError::Connection(format!("Failed to connect to Pushover: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::Decode(format!("Failed to read Pushover response: {}", e))
        })?;

        let pushover_response: PushoverResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::Decode(format!(
                "Failed to parse Pushover response ({}): {}",
                status, e
            ))
        })?;

        if pushover_response.status != 1 || !pushover_response.errors.is_empty() {
            let reason = if pushover_response.errors.is_empty() {
                format!("status {}", pushover_response.status)
            } else {
                pushover_response.errors.join(", ")
            };
            return Err(ProviderError::Rejected(format!(
                "Pushover rejected message: {}",
                reason
            )));
        }

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            request_id = ?pushover_response.request,
            title = %push.title,
            "Notification delivered to Pushover"
        );

        Ok(ProviderResponse::success(pushover_response.request))
    }

    fn name(&self) -> &'static str {
        "pushover"
    }
}
