// src/output.rs
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::mast::types::ObservationRecord;
use crate::window::{format_utc, TimeWindow};

/// Snapshot written for the site: generation stamp, queried window, rows,
/// and the failure message when a run could not finish cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub generated_utc: String,
    pub window_utc: [String; 2],
    pub jwst: Vec<ObservationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwst_error: Option<String>,
}

impl ResultEnvelope {
    pub fn new(window: &TimeWindow, rows: Vec<ObservationRecord>, error: Option<String>) -> Self {
        Self {
            generated_utc: format_utc(Utc::now().trunc_subsecs(0)),
            window_utc: [format_utc(window.start), format_utc(window.end)],
            jwst: rows,
            jwst_error: error,
        }
    }
}

/// Write the envelope as compact JSON, creating parent directories first.
/// Plain overwrite; the file is small and consumers re-read it whole.
pub fn write_envelope(path: &Path, envelope: &ResultEnvelope) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let body = serde_json::to_vec(envelope).context("encoding snapshot")?;
    fs::write(path, body).with_context(|| format!("writing snapshot to {}", path.display()))?;
    Ok(())
}
