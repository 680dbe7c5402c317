//! Infrastructure Layer
//!
//! HTTP clients for the external collaborators plus process-local
//! resources (application state, upload staging).

pub mod gateway;
pub mod gdocs;
pub mod gdrive;
pub mod sheets;
pub mod staging;
pub mod state;

pub use gateway::WaGateway;
pub use gdocs::GoogleDocuments;
pub use gdrive::DriveObjects;
pub use sheets::SheetsLedger;
pub use state::AppState;
