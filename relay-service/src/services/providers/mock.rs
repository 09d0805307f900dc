use super::{ProviderError, ProviderResponse, PushMessage, PushProvider};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Mock push provider for testing and dry runs.
///
/// Every message is recorded in call order, whether or not the send fails.
pub struct MockPushProvider {
    fail: bool,
    delay: Option<Duration>,
    sent: Mutex<Vec<PushMessage>>,
}

impl MockPushProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            delay: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every send returns an error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// A provider that waits `delay` before recording each send.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn send_count(&self) -> usize {
        self.sent().len()
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for MockPushProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushProvider for MockPushProvider {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let count = {
            let mut sent = match self.sent.lock() {
                Ok(sent) => sent,
                Err(poisoned) => poisoned.into_inner(),
            };
            sent.push(push.clone());
            sent.len()
        };

        if self.fail {
            return Err(ProviderError::Rejected(
                "Mock push provider configured to fail".to_string(),
            ));
        }

        tracing::info!(
            title = %push.title,
            message = %push.message,
            url = ?push.url,
            "[MOCK] Push notification would be sent"
        );

        Ok(ProviderResponse::success(Some(format!("mock-push-{}", count))))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
