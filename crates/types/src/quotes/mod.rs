//! Quote result models

pub mod errors;
pub mod response;

pub use errors::ErrorKind;
pub use response::{QuoteFailure, QuoteOffer, QuoteResult, RouteResponse};
