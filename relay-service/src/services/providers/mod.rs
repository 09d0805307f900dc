pub mod gotify;
pub mod mock;
pub mod pushover;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::LogEntry;

pub use gotify::GotifyProvider;
pub use mock::MockPushProvider;
pub use pushover::PushoverProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
    pub success: bool,
}

impl ProviderResponse {
    pub fn success(provider_id: Option<String>) -> Self {
        Self {
            provider_id,
            success: true,
        }
    }
}

/// Provider-neutral notification built from one log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub message: String,
    pub url: Option<String>,
}

impl From<&LogEntry> for PushMessage {
    fn from(entry: &LogEntry) -> Self {
        Self {
            title: entry.message.clone(),
            message: entry.event_type.clone(),
            url: entry.data.url.clone().filter(|url| !url.is_empty()),
        }
    }
}

/// An outbound push notification service.
#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventData;

    #[test]
    fn maps_message_to_title_and_type_to_body() {
        let entry = LogEntry {
            event_type: "error".to_string(),
            message: "node down".to_string(),
            data: EventData {
                url: Some("https://example".to_string()),
                ..EventData::default()
            },
            ..LogEntry::default()
        };

        let push = PushMessage::from(&entry);
        assert_eq!(push.title, "node down");
        assert_eq!(push.message, "error");
        assert_eq!(push.url.as_deref(), Some("https://example"));
    }

    #[test]
    fn empty_url_is_dropped() {
        let entry = LogEntry {
            data: EventData {
                url: Some(String::new()),
                ..EventData::default()
            },
            ..LogEntry::default()
        };

        assert!(PushMessage::from(&entry).url.is_none());
    }
}
