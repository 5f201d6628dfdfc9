//! Incremental reconciliation against a remote aggregation endpoint.
//!
//! One pass reads the stored cursor, fetches everything newer, normalizes
//! and merges it into the local store, then advances the cursor. Per-record
//! normalization failures are skipped; a non-2xx response aborts the whole
//! pass with the cursor untouched so the next attempt retries the same
//! window.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::app::{InletError, Result};
use crate::domain::NewItem;
use crate::normalizer::{self, dedup, normalize_record, SyncCandidate};
use crate::store::{Store, SYNC_CURSOR_KEY};

const SYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one completed sync pass.
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub previous_cursor: Option<String>,
    pub cursor: String,
    pub accepted: usize,
    pub skipped: usize,
}

pub struct SyncClient {
    client: reqwest::Client,
    endpoint: String,
    /// Single-flight guard: at most one pass at a time, a second caller
    /// fails fast instead of queuing.
    in_flight: Mutex<()>,
}

impl SyncClient {
    pub fn new(endpoint: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SYNC_TIMEOUT)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("inlet/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint,
            in_flight: Mutex::new(()),
        }
    }

    /// One-shot reconciliation pass. No retry: a failed pass leaves the
    /// cursor where it was.
    pub async fn run<S: Store>(&self, store: &S) -> Result<SyncSummary> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| InletError::SyncInFlight)?;

        let since = store.get_meta(SYNC_CURSOR_KEY)?;
        tracing::debug!(since = since.as_deref().unwrap_or(""), "starting sync pass");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("since", since.as_deref().unwrap_or(""))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InletError::SyncFailed {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        reconcile(store, &payload, Utc::now())
    }
}

/// Accepted envelope shapes, tried in order: a bare array, `{items: [..]}`,
/// `{data: [..]}`, `{data: {items: [..]}}`. Resolved once here; the rest of
/// the pipeline only ever sees a flat record slice.
pub fn extract_records(payload: &Value) -> &[Value] {
    let rules: [Option<&Vec<Value>>; 4] = [
        payload.as_array(),
        payload.get("items").and_then(Value::as_array),
        payload.get("data").and_then(Value::as_array),
        payload
            .get("data")
            .and_then(|d| d.get("items"))
            .and_then(Value::as_array),
    ];
    rules
        .into_iter()
        .flatten()
        .find(|a| !a.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Merge a parsed sync payload into the store and advance the cursor.
///
/// Sources land before items so every item's source row exists. The whole
/// sequence is best-effort: there is no rollback if the cursor write fails
/// after items partially applied.
pub fn reconcile<S: Store>(store: &S, payload: &Value, now: DateTime<Utc>) -> Result<SyncSummary> {
    let previous_cursor = store.get_meta(SYNC_CURSOR_KEY)?;

    let mut candidates: Vec<SyncCandidate> = Vec::new();
    let mut skipped = 0usize;
    for raw in extract_records(payload) {
        match normalize_record(raw, now) {
            Some(candidate) => candidates.push(candidate),
            None => {
                skipped += 1;
                tracing::debug!("skipping unnormalizable sync record");
            }
        }
    }
    let accepted = candidates.len();

    // Sources first; within the batch the last mention of an id wins, and
    // the stored enabled/added_at are carried over so sync can never
    // re-enable what the user disabled.
    let mut source_ids: Vec<String> = Vec::new();
    let mut sources = std::collections::HashMap::new();
    for candidate in &candidates {
        if !sources.contains_key(&candidate.source.id) {
            source_ids.push(candidate.source.id.clone());
        }
        sources.insert(candidate.source.id.clone(), candidate.source.clone());
    }
    for id in &source_ids {
        if let Some(mut incoming) = sources.remove(id) {
            if let Some(stored) = store.get_source(id)? {
                incoming.enabled = stored.enabled;
                incoming.added_at = stored.added_at;
            }
            store.upsert_source(&incoming)?;
        }
    }

    let max_cursor = candidates.iter().filter_map(|c| c.cursor).max();

    let items: Vec<NewItem> = dedup::merge(candidates.into_iter().map(|c| c.item).collect());
    for item in &items {
        store.upsert_item(item)?;
    }

    // Advance the watermark: max cursor seen, else "now"; never backward.
    let observed = max_cursor.unwrap_or(now);
    let previous_dt = previous_cursor.as_deref().and_then(normalizer::parse_date);
    let new_dt = match previous_dt {
        Some(prev) if prev > observed => prev,
        _ => observed,
    };
    let cursor = new_dt.to_rfc3339_opts(SecondsFormat::Secs, true);
    store.set_meta(SYNC_CURSOR_KEY, &cursor)?;

    tracing::info!(accepted, skipped, cursor = %cursor, "sync pass complete");

    Ok(SyncSummary {
        previous_cursor,
        cursor,
        accepted,
        skipped,
    })
}
