use super::{ProviderError, ProviderResponse, PushMessage, PushProvider};
use crate::config::GotifyConfig;
use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

const GOTIFY_KEY_HEADER: &str = "X-Gotify-Key";

/// Sends notifications to a Gotify server as application messages.
pub struct GotifyProvider {
    config: GotifyConfig,
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Serialize)]
struct GotifyRequest<'a> {
    title: &'a str,
    message: &'a str,
    priority: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    extras: Option<GotifyExtras<'a>>,
}

#[derive(Debug, Serialize)]
struct GotifyExtras<'a> {
    #[serde(rename = "client::notification")]
    notification: ClientNotification<'a>,
}

#[derive(Debug, Serialize)]
struct ClientNotification<'a> {
    click: ClickAction<'a>,
}

#[derive(Debug, Serialize)]
struct ClickAction<'a> {
    url: &'a str,
}

// Success and error bodies share one shape; only the relevant fields are present.
#[derive(Debug, Deserialize)]
struct GotifyResponse {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "errorCode")]
    error_code: Option<i64>,
    #[serde(default, rename = "errorDescription")]
    error_description: Option<String>,
}

impl GotifyProvider {
    pub fn new(config: GotifyConfig, client: Client) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(&format!("{}/message", config.url.trim_end_matches('/')))
            .map_err(|e| {
                ProviderError::Configuration(format!("Invalid Gotify URL '{}': {}", config.url, e))
            })?;

        Ok(Self {
            config,
            client,
            endpoint,
        })
    }
}

#[async_trait]
impl PushProvider for GotifyProvider {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError> {
        let request = GotifyRequest {
            title: &push.title,
            message: &push.message,
            priority: self.config.priority,
            extras: push.url.as_deref().map(|url| GotifyExtras {
                notification: ClientNotification {
                    click: ClickAction { url },
                },
            }),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(GOTIFY_KEY_HEADER, self.config.app_token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("Failed to connect to Gotify: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Decode(format!("Failed to read Gotify response: {}", e)))?;

        let gotify_response: GotifyResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::Decode(format!("Failed to parse Gotify response ({}): {}", status, e))
        })?;

        if let Some(error) = gotify_response.error.filter(|e| !e.is_empty()) {
            return Err(ProviderError::Rejected(format!(
                "Error Code: {}, {}, {}",
                gotify_response.error_code.unwrap_or_default(),
                error,
                gotify_response.error_description.unwrap_or_default()
            )));
        }

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            message_id = ?gotify_response.id,
            title = %push.title,
            "Notification delivered to Gotify"
        );

        Ok(ProviderResponse::success(
            gotify_response.id.map(|id| id.to_string()),
        ))
    }

    fn name(&self) -> &'static str {
        "gotify"
    }
}
