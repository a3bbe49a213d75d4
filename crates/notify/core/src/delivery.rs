//! Delivery units and provider outcomes.

use std::collections::HashMap;

use crate::Message;

/// One recipient's message, ready to hand to a delivery provider.
///
/// Units borrow the shared data and template from the request they were built from,
/// so every unit in a batch carries the same payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryUnit<'a> {
    /// Recipient registration token.
    pub token: &'a str,
    /// Shared key-value data.
    pub data: &'a HashMap<String, String>,
    /// Shared notification template, if any.
    pub message: Option<&'a Message>,
}

/// Provider result for the unit at the same position in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The provider accepted the unit.
    Delivered { id: String },
    /// The provider rejected the unit.
    Failed { error: String },
}

impl DeliveryOutcome {
    /// Create a successful outcome.
    pub fn success(id: impl Into<String>) -> Self {
        Self::Delivered { id: id.into() }
    }

    /// Create a failed outcome.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }

    /// Check if the unit was delivered.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}
