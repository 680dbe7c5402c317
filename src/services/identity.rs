//! Ledger identity: ordinal allocation and tolerant id resolution.
//!
//! The ledger offers no atomic increment, so "row count + 1" is inherently
//! racy across writers. Within this process the [`OrdinalSequencer`]
//! serializes allocations behind a mutex and keeps a per-region high-water
//! mark, so two concurrent submissions can never be handed the same ordinal
//! even when both ledger reads return the same stale count.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{LedgerStore, Region, ServiceError};

/// Strip leading zeros the way the ledger's loose references are compared.
/// `"0007"` and `"7"` refer to the same record; all-zero input collapses to
/// an empty string and matches nothing meaningful.
pub fn strip_ordinal(raw: &str) -> &str {
    raw.trim().trim_start_matches('0')
}

/// A row found by [`resolve`], with its 1-based spreadsheet row number.
#[derive(Debug, Clone)]
pub struct ResolvedRow {
    pub row_number: u32,
    pub cells: Vec<String>,
}

/// Single-writer sequencer for ordinal assignment.
#[derive(Default)]
pub struct OrdinalSequencer {
    counters: Mutex<HashMap<&'static str, u32>>,
}

impl OrdinalSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next ordinal for `region`: the ledger's current row count plus one,
    /// reconciled against the in-process high-water mark. A failed ledger
    /// read is logged and treated as an empty region; the cached counter
    /// still advances, so allocation never fails and never repeats within
    /// this process.
    pub async fn allocate_next(&self, ledger: &dyn LedgerStore, region: &Region) -> u32 {
        let count = match ledger.read_range(&region.count_range()).await {
            Ok(rows) => rows.len() as u32,
            Err(e) => {
                tracing::warn!(
                    region = region.name,
                    "ledger count read failed, treating region as empty: {}",
                    e
                );
                0
            }
        };

        let mut counters = self.counters.lock().await;
        let cached = counters.entry(region.name).or_insert(0);
        let next = count.max(*cached) + 1;
        *cached = next;
        next
    }
}

/// Scan `region` for the first row whose key column matches `raw_id` after
/// stripping leading zeros from both sides. Duplicate ids resolve to the
/// first row encountered; callers must not rely on recency.
pub async fn resolve(
    ledger: &dyn LedgerStore,
    region: &Region,
    raw_id: &str,
) -> Result<Option<ResolvedRow>, ServiceError> {
    scan(ledger, region, raw_id, false).await
}

/// Like [`resolve`] but keeps the **last** matching row. Used by the Return
/// pipeline to join the most recent approval for a loan.
pub async fn resolve_latest(
    ledger: &dyn LedgerStore,
    region: &Region,
    raw_id: &str,
) -> Result<Option<ResolvedRow>, ServiceError> {
    scan(ledger, region, raw_id, true).await
}

async fn scan(
    ledger: &dyn LedgerStore,
    region: &Region,
    raw_id: &str,
    keep_last: bool,
) -> Result<Option<ResolvedRow>, ServiceError> {
    let wanted = strip_ordinal(raw_id);
    if wanted.is_empty() {
        return Ok(None);
    }

    let rows = ledger.read_range(&region.data_range()).await?;
    let mut found = None;

    for (i, row) in rows.iter().enumerate() {
        let key = row.get(region.key_column).map(String::as_str).unwrap_or("");
        if strip_ordinal(key) == wanted {
            let resolved = ResolvedRow {
                row_number: region.header_rows + 1 + i as u32,
                cells: row.clone(),
            };
            if !keep_last {
                return Ok(Some(resolved));
            }
            found = Some(resolved);
        }
    }

    Ok(found)
}
