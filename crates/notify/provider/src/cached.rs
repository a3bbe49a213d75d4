//! Lazily constructed provider.

use tokio::sync::OnceCell;

use crate::{ProviderFactory, ProviderSource};

/// Builds the provider on first use and reuses it afterwards.
///
/// A failed build is not cached: the next caller runs the factory again.
pub struct CachedProvider<F: ProviderFactory> {
    factory: F,
    provider: OnceCell<F::Provider>,
}

impl<F: ProviderFactory> CachedProvider<F> {
    /// Create a new cached provider around a factory.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            provider: OnceCell::new(),
        }
    }
}

impl<F: ProviderFactory> ProviderSource for CachedProvider<F> {
    type Provider = F::Provider;

    async fn provider(&self) -> color_eyre::eyre::Result<&F::Provider> {
        self.provider
            .get_or_try_init(|| async {
                tracing::info!("building delivery provider client");
                self.factory.build().await
            })
            .await
    }
}
