//! Delivery provider traits.

use notify_core::{DeliveryOutcome, DeliveryUnit};

/// A provider that accepts many delivery units in one call.
#[trait_variant::make(Send)]
pub trait DeliveryProvider: Send + Sync {
    /// Deliver a batch of units.
    ///
    /// On success the returned outcomes line up with `units` by position. An error
    /// means the call itself failed and no unit should be considered delivered.
    async fn send_batch(
        &self,
        units: &[DeliveryUnit<'_>],
    ) -> color_eyre::eyre::Result<Vec<DeliveryOutcome>>;
}

/// Builds a provider client, typically after loading credentials.
#[trait_variant::make(Send)]
pub trait ProviderFactory: Send + Sync {
    type Provider: DeliveryProvider;

    /// Construct a new provider client.
    async fn build(&self) -> color_eyre::eyre::Result<Self::Provider>;
}

/// Hands out a ready-to-use provider.
#[trait_variant::make(Send)]
pub trait ProviderSource: Send + Sync {
    type Provider: DeliveryProvider;

    /// Get the provider, constructing it if needed.
    async fn provider(&self) -> color_eyre::eyre::Result<&Self::Provider>;
}
