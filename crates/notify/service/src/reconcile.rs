//! Outcome reconciliation.
//!
//! Outcomes are matched to units purely by position. Recipient tokens may repeat
//! within a batch, so they are only copied onto the records, never used to look
//! anything up.

use notify_core::{DeliveryOutcome, DeliveryUnit, Notification, NotificationError, PushError};

/// Delivered and failed records of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub notifications: Vec<Notification>,
    /// Failures in outcome order.
    pub errors: Vec<NotificationError>,
}

/// Attribute each outcome to the unit at the same index.
///
/// Every index lands in exactly one of the two collections.
pub fn reconcile(
    units: &[DeliveryUnit<'_>],
    outcomes: Vec<DeliveryOutcome>,
) -> Result<Reconciled, PushError> {
    if units.len() != outcomes.len() {
        return Err(PushError::ProtocolViolation {
            units: units.len(),
            outcomes: outcomes.len(),
        });
    }

    let mut reconciled = Reconciled::default();

    for (index, (unit, outcome)) in units.iter().zip(outcomes).enumerate() {
        match outcome {
            DeliveryOutcome::Delivered { id } => {
                reconciled.notifications.push(Notification {
                    id,
                    recipient: unit.token.to_string(),
                    data: unit.data.clone(),
                    message: unit.message.cloned(),
                });
            }
            DeliveryOutcome::Failed { error } => {
                tracing::debug!(index, recipient = unit.token, error = %error, "delivery failed");
                reconciled.errors.push(NotificationError {
                    recipient: unit.token.to_string(),
                    message: error,
                });
            }
        }
    }

    Ok(reconciled)
}
