//! Haul API
//!
//! Axum-based routes and middleware for the hauling quote aggregator.

pub mod handlers;
pub mod router;
pub mod security;
pub mod state;

pub use router::create_router;
pub use state::AppState;
