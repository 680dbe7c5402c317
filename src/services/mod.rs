//! Services Layer
//!
//! Pure business logic and the pipeline orchestration, free of HTTP
//! concerns. Everything here talks to the outside world only through the
//! collaborator traits in `domain`.

pub mod identity;
pub mod lifecycle;
pub mod notify;
pub mod phone;
pub mod render;
pub mod supervisor;
