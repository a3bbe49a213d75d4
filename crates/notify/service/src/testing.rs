//! Provider doubles for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use notify_core::{DeliveryOutcome, DeliveryUnit};
use notify_provider::{DeliveryProvider, ProviderSource};

/// Replays a fixed outcome list and records every batch it receives.
pub struct ScriptedProvider {
    outcomes: Option<Vec<DeliveryOutcome>>,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<DeliveryOutcome>) -> Self {
        Self {
            outcomes: Some(outcomes),
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose batch call always fails.
    pub fn unavailable() -> Self {
        Self {
            outcomes: None,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

impl DeliveryProvider for ScriptedProvider {
    async fn send_batch(
        &self,
        units: &[DeliveryUnit<'_>],
    ) -> color_eyre::eyre::Result<Vec<DeliveryOutcome>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches
            .lock()
            .unwrap()
            .push(units.iter().map(|u| u.token.to_string()).collect());

        self.outcomes
            .clone()
            .ok_or_else(|| color_eyre::eyre::eyre!("connection reset by peer"))
    }
}

impl ProviderSource for ScriptedProvider {
    type Provider = Self;

    async fn provider(&self) -> color_eyre::eyre::Result<&Self> {
        Ok(self)
    }
}

/// A source whose provider can never be built.
pub struct BrokenSource;

impl ProviderSource for BrokenSource {
    type Provider = ScriptedProvider;

    async fn provider(&self) -> color_eyre::eyre::Result<&ScriptedProvider> {
        color_eyre::eyre::bail!("cannot load secret ocid1.vaultsecret.oc1..x")
    }
}
