use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,

    // Ledger collaborator
    pub spreadsheet_id: String,
    pub google_api_token: String,
    pub sheets_api_base: String,

    // Document / storage collaborators
    pub docs_api_base: String,
    pub drive_api_base: String,
    pub drive_upload_base: String,
    pub loan_template_id: String,
    pub approval_template_id: String,
    pub return_template_id: String,
    pub doc_folder_id: String,
    pub pdf_folder_id: String,
    pub photo_folder_id: String,

    // Messaging gateway
    pub gateway_url: String,
    pub gateway_api_key: String,
    pub gateway_sender: String,

    // Participants
    pub approver_number: String,
    pub approval_link: String,

    // Local staging and pipeline behavior
    pub upload_dir: String,
    pub strict_templates: bool,
    pub pipeline_workers: usize,
    pub pipeline_queue: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            spreadsheet_id: env::var("SPREADSHEET_ID").unwrap_or_default(),
            google_api_token: env::var("GOOGLE_API_TOKEN").unwrap_or_default(),
            sheets_api_base: env::var("SHEETS_API_BASE")
                .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string()),
            docs_api_base: env::var("DOCS_API_BASE")
                .unwrap_or_else(|_| "https://docs.googleapis.com".to_string()),
            drive_api_base: env::var("DRIVE_API_BASE")
                .unwrap_or_else(|_| "https://www.googleapis.com".to_string()),
            drive_upload_base: env::var("DRIVE_UPLOAD_BASE")
                .unwrap_or_else(|_| "https://www.googleapis.com".to_string()),
            loan_template_id: env::var("LOAN_TEMPLATE_ID").unwrap_or_default(),
            approval_template_id: env::var("APPROVAL_TEMPLATE_ID").unwrap_or_default(),
            return_template_id: env::var("RETURN_TEMPLATE_ID").unwrap_or_default(),
            doc_folder_id: env::var("DOC_FOLDER_ID").unwrap_or_default(),
            pdf_folder_id: env::var("PDF_FOLDER_ID").unwrap_or_default(),
            photo_folder_id: env::var("PHOTO_FOLDER_ID").unwrap_or_default(),
            gateway_url: env::var("WA_GATEWAY_URL")
                .unwrap_or_else(|_| "https://wa.bangkitsolusibangsa.id/send-message".to_string()),
            gateway_api_key: env::var("WA_API_KEY").unwrap_or_default(),
            gateway_sender: env::var("WA_SENDER").unwrap_or_else(|_| "6287760573989".to_string()),
            approver_number: env::var("APPROVER_NO")
                .unwrap_or_else(|_| "6287760573989".to_string()),
            approval_link: env::var("APPROVAL_LINK")
                .unwrap_or_else(|_| "https://example.com/approval".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            strict_templates: env::var("STRICT_TEMPLATES")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            pipeline_workers: env::var("PIPELINE_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            pipeline_queue: env::var("PIPELINE_QUEUE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64),
        }
    }

    /// Baseline config for tests: no external endpoints, lenient templates.
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            spreadsheet_id: "test-sheet".to_string(),
            google_api_token: String::new(),
            sheets_api_base: String::new(),
            docs_api_base: String::new(),
            drive_api_base: String::new(),
            drive_upload_base: String::new(),
            loan_template_id: "tpl-loan".to_string(),
            approval_template_id: "tpl-approval".to_string(),
            return_template_id: "tpl-return".to_string(),
            doc_folder_id: "folder-doc".to_string(),
            pdf_folder_id: "folder-pdf".to_string(),
            photo_folder_id: "folder-photo".to_string(),
            gateway_url: String::new(),
            gateway_api_key: String::new(),
            gateway_sender: "6280000000000".to_string(),
            approver_number: "6287760573989".to_string(),
            approval_link: "https://example.com/approval".to_string(),
            upload_dir: std::env::temp_dir().display().to_string(),
            strict_templates: false,
            pipeline_workers: 2,
            pipeline_queue: 16,
        }
    }
}
