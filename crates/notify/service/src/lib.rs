//! Notify Service
//!
//! Batch dispatch and reconciliation: validate a push request, expand it into
//! delivery units, hand them to a provider in one batch and attribute each
//! outcome back to its recipient.

mod assemble;
mod build;
mod dispatch;
mod reconcile;
mod service;
mod validate;

pub use assemble::*;
pub use build::*;
pub use dispatch::*;
pub use reconcile::*;
pub use service::*;
pub use validate::*;

#[cfg(test)]
mod testing;
