//! Fan-out of a decoded batch to the configured push provider.

use super::providers::{PushMessage, PushProvider};
use crate::models::LogEntry;

/// Counts for one relayed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    pub attempted: usize,
    pub failed: usize,
}

/// Send one notification per entry, strictly in input order.
///
/// A failed send is logged and skipped; it never stops the batch and is never
/// retried.
pub async fn relay_batch(provider: &dyn PushProvider, batch: &[LogEntry]) -> RelayOutcome {
    let mut outcome = RelayOutcome::default();

    for entry in batch {
        let push = PushMessage::from(entry);
        outcome.attempted += 1;

        match provider.send(&push).await {
            Ok(response) => tracing::debug!(
                provider = provider.name(),
                provider_id = ?response.provider_id,
                "Relayed notification"
            ),
            Err(e) => {
                outcome.failed += 1;
                tracing::error!(
                    provider = provider.name(),
                    event_type = %entry.event_type,
                    tailnet = %entry.tailnet,
                    error = %e,
                    "Failed to relay notification"
                );
            }
        }
    }

    outcome
}
