//! Response assembly.

use notify_core::PushResponse;

use crate::Reconciled;

/// Package reconciled records into the response.
///
/// Empty collections are dropped from the wire shape by serialization.
pub fn assemble(reconciled: Reconciled) -> PushResponse {
    PushResponse {
        notifications_count: reconciled.notifications.len(),
        errors_count: reconciled.errors.len(),
        notifications: reconciled.notifications,
        errors: reconciled.errors,
    }
}
