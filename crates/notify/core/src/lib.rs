//! Notify Core Types
//!
//! Wire model, delivery units and the error taxonomy shared by the push pipeline.

mod delivery;
mod error;
mod model;

pub use delivery::*;
pub use error::*;
pub use model::*;
