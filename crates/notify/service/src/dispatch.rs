//! Batch dispatch to the delivery provider.

use notify_core::{DeliveryOutcome, DeliveryUnit, PushError};
use notify_provider::{DeliveryProvider, ProviderSource};

/// Submit all units to the provider in one batch.
///
/// An empty batch never touches the provider, not even to construct it. The
/// returned outcomes are guaranteed to line up one-to-one with `units`.
pub async fn dispatch<S: ProviderSource>(
    source: &S,
    units: &[DeliveryUnit<'_>],
) -> Result<Vec<DeliveryOutcome>, PushError> {
    if units.is_empty() {
        return Ok(Vec::new());
    }

    let provider = source.provider().await.map_err(PushError::Setup)?;

    let outcomes = provider
        .send_batch(units)
        .await
        .map_err(PushError::Provider)?;

    if outcomes.len() != units.len() {
        return Err(PushError::ProtocolViolation {
            units: units.len(),
            outcomes: outcomes.len(),
        });
    }

    Ok(outcomes)
}
