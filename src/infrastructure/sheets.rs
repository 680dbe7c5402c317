//! Spreadsheet ledger client (Google Sheets values API).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{LedgerStore, ServiceError};

pub struct SheetsLedger {
    client: reqwest::Client,
    base: String,
    spreadsheet_id: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    values: Option<Vec<Vec<Value>>>,
}

impl SheetsLedger {
    pub fn new(base: &str, spreadsheet_id: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base: base.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            token: token.to_string(),
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }
}

/// Cells come back as strings, numbers or booleans; the ledger model is
/// all-strings.
fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl LedgerStore for SheetsLedger {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, ServiceError> {
        let resp = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ServiceError::Ledger(format!("read {}: {}", range, e)))?;

        if !resp.status().is_success() {
            return Err(ServiceError::Ledger(format!(
                "read {}: status {}",
                range,
                resp.status()
            )));
        }

        let body: ValueRange = resp
            .json()
            .await
            .map_err(|e| ServiceError::Ledger(format!("read {}: {}", range, e)))?;

        Ok(body
            .values
            .unwrap_or_default()
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    async fn write_range(&self, start: &str, rows: Vec<Vec<String>>) -> Result<(), ServiceError> {
        let url = format!("{}?valueInputOption=USER_ENTERED", self.values_url(start));
        let resp = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": rows }))
            .send()
            .await
            .map_err(|e| ServiceError::Ledger(format!("write {}: {}", start, e)))?;

        if !resp.status().is_success() {
            return Err(ServiceError::Ledger(format!(
                "write {}: status {}",
                start,
                resp.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_convert_to_strings() {
        assert_eq!(cell_to_string(&json!("0007")), "0007");
        assert_eq!(cell_to_string(&json!(7)), "7");
        assert_eq!(cell_to_string(&json!(true)), "true");
        assert_eq!(cell_to_string(&Value::Null), "");
    }

    #[test]
    fn range_is_url_encoded() {
        let ledger = SheetsLedger::new("https://sheets.example", "abc", "tok");
        assert_eq!(
            ledger.values_url("Form Peminjam!B5:B"),
            "https://sheets.example/v4/spreadsheets/abc/values/Form%20Peminjam%21B5%3AB"
        );
    }
}
