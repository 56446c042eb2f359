//! Adapter types and traits

pub mod errors;
pub mod traits;

pub use errors::AdapterError;
pub use traits::*;

pub type AdapterResult<T> = Result<T, AdapterError>;
