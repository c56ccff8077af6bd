pub mod error;
pub mod types;

#[cfg(feature = "settlement")]
pub mod settlement;

#[cfg(feature = "boleto")]
pub mod boleto;

pub use error::CobaleError;
pub use types::*;

/// Standard result type for all cobale operations
pub type CobaleResult<T> = Result<T, CobaleError>;
