//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no reqwest, no Axum).
//! Only trait definitions, region layouts and domain error types.

pub mod collaborators;
pub mod errors;
pub mod regions;

pub use collaborators::*;
pub use errors::ServiceError;
pub use regions::{Region, APPROVAL, LOAN, RETURN};
