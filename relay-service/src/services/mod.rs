pub mod providers;
pub mod relay;

pub use providers::{
    GotifyProvider, MockPushProvider, ProviderError, ProviderResponse, PushMessage, PushProvider,
    PushoverProvider,
};
pub use relay::{relay_batch, RelayOutcome};

use crate::config::{OutboundConfig, ProviderConfig};
use reqwest::Client;
use std::sync::Arc;

/// Build the single HTTP client shared by every outbound call.
pub fn build_http_client(config: &OutboundConfig) -> Result<Client, ProviderError> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| ProviderError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Construct the configured provider around the shared client.
pub fn build_provider(
    config: &ProviderConfig,
    client: Client,
) -> Result<Arc<dyn PushProvider>, ProviderError> {
    let provider: Arc<dyn PushProvider> = match config {
        ProviderConfig::Gotify(gotify) => {
            tracing::info!(url = %gotify.url, "Gotify push provider initialized");
            Arc::new(GotifyProvider::new(gotify.clone(), client)?)
        }
        ProviderConfig::Pushover(pushover) => {
            tracing::info!("Pushover push provider initialized");
            Arc::new(PushoverProvider::new(pushover.clone(), client)?)
        }
        ProviderConfig::Mock => {
            tracing::warn!("Mock push provider selected, notifications will only be logged");
            Arc::new(MockPushProvider::new())
        }
    };

    Ok(provider)
}
