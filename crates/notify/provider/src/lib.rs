//! Notify Delivery Providers
//!
//! Batch delivery to an external push provider, plus lazy provider construction.

mod cached;
mod fcm;
mod traits;

pub use cached::*;
pub use fcm::*;
pub use traits::*;
