//! Application state containing collaborators and shared resources

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{DocumentStore, LedgerStore, Messenger, ObjectStore};
use crate::infrastructure::{DriveObjects, GoogleDocuments, SheetsLedger, WaGateway};
use crate::services::identity::OrdinalSequencer;
use crate::services::supervisor::PipelineSupervisor;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ledger: Arc<dyn LedgerStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub messenger: Arc<dyn Messenger>,
    pub sequencer: Arc<OrdinalSequencer>,
    pub supervisor: Arc<PipelineSupervisor>,
}

impl AppState {
    /// Assemble state from explicit collaborators. Tests pass in-memory
    /// fakes here; production uses [`AppState::from_config`].
    pub fn new(
        config: Config,
        ledger: Arc<dyn LedgerStore>,
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let supervisor =
            PipelineSupervisor::start(config.pipeline_workers, config.pipeline_queue);
        Self {
            config,
            ledger,
            documents,
            objects,
            messenger,
            sequencer: Arc::new(OrdinalSequencer::new()),
            supervisor,
        }
    }

    /// Wire up the real HTTP collaborators.
    pub fn from_config(config: Config) -> Self {
        let ledger = Arc::new(SheetsLedger::new(
            &config.sheets_api_base,
            &config.spreadsheet_id,
            &config.google_api_token,
        ));
        let documents = Arc::new(GoogleDocuments::new(
            &config.docs_api_base,
            &config.drive_api_base,
            &config.google_api_token,
        ));
        let objects = Arc::new(DriveObjects::new(
            &config.drive_upload_base,
            &config.drive_api_base,
            &config.google_api_token,
        ));
        let messenger = Arc::new(WaGateway::new(
            &config.gateway_url,
            &config.gateway_api_key,
            &config.gateway_sender,
        ));
        Self::new(config, ledger, documents, objects, messenger)
    }
}
