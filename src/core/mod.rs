pub mod error;
pub mod types;

pub use error::{GatewayError, Result};
pub use types::{Decimal, RecordId, RecordRef, Reference, ResourceKind};
