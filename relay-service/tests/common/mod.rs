#![allow(dead_code)]

use relay_service::config::{ApiConfig, OutboundConfig, ProviderConfig, RelayConfig};
use relay_service::services::MockPushProvider;
use relay_service::startup::Application;
use reqwest::{Client, Response};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_MAX_BODY_BYTES: usize = 64 * 1024;

pub const EXAMPLE_BATCH: &str = r#"[{"timestamp":"t","version":1,"type":"error","tailnet":"x","message":"node down","data":{"url":"https://example"}}]"#;

pub fn test_config(provider: ProviderConfig) -> RelayConfig {
    RelayConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            // Use random port for testing (port 0)
            port: 0,
            ..CoreConfig::default()
        },
        api: ApiConfig {
            token: Secret::new(TEST_TOKEN.to_string()),
            max_body_bytes: TEST_MAX_BODY_BYTES,
        },
        provider,
        outbound: OutboundConfig::default(),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
    mock: Option<Arc<MockPushProvider>>,
}

impl TestApp {
    /// Spawn the relay backed by a recording mock provider.
    pub async fn spawn() -> Self {
        Self::spawn_with_mock(MockPushProvider::new()).await
    }

    /// Spawn the relay backed by a mock provider that fails every send.
    pub async fn spawn_failing() -> Self {
        Self::spawn_with_mock(MockPushProvider::failing()).await
    }

    async fn spawn_with_mock(mock: MockPushProvider) -> Self {
        let mock = Arc::new(mock);
        let app = Application::build_with_provider(test_config(ProviderConfig::Mock), mock.clone())
            .await
            .expect("Failed to build test application");

        Self::run(app, Some(mock))
    }

    /// Spawn the relay with the provider described by `config`.
    pub async fn spawn_with_config(config: RelayConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        Self::run(app, None)
    }

    fn run(app: Application, mock: Option<Arc<MockPushProvider>>) -> Self {
        let port = app.port();
        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            client: Client::new(),
            mock,
        }
    }

    pub fn mock(&self) -> &MockPushProvider {
        self.mock
            .as_deref()
            .expect("Test app was not spawned with a mock provider")
    }

    pub fn api_url(&self, token: &str) -> String {
        format!("{}/api/{}", self.address, token)
    }

    pub async fn post_events(&self, token: &str, body: &str) -> Response {
        self.client
            .post(self.api_url(token))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
