// src/mast/types.rs
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::window::MjdRange;

/// One archive row in the fixed column projection. Every projected column
/// may come back null; anything else the service returns rides along in
/// `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ObservationRecord {
    pub obs_collection: Option<String>,
    /// Numeric in CAOM, a string in some older services.
    pub obsid: Option<Value>,
    pub obs_id: Option<String>,
    pub proposal_id: Option<String>,
    pub instrument_name: Option<String>,
    pub target_name: Option<String>,
    pub t_min: Option<f64>,
    pub t_max: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// De-duplication identity: the archive observation id when present,
/// otherwise a composite of the observation-set id and the time bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObsKey {
    Obsid(String),
    Composite(String),
}

impl ObservationRecord {
    pub fn identity(&self) -> ObsKey {
        match &self.obsid {
            Some(v) => ObsKey::Obsid(v.to_string()),
            None => ObsKey::Composite(format!(
                "{}|{}|{}",
                self.obs_id.as_deref().unwrap_or(""),
                self.t_min.map(|v| v.to_string()).unwrap_or_default(),
                self.t_max.map(|v| v.to_string()).unwrap_or_default(),
            )),
        }
    }

    /// Raw target name as the archive spelled it; empty when missing.
    pub fn target(&self) -> &str {
        self.target_name.as_deref().unwrap_or("")
    }
}

/// Seam between the paginator and the HTTP client so scenario tests can
/// script page sequences without a network.
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    async fn query_page(&self, range: MjdRange, page: u32) -> Result<Vec<ObservationRecord>>;
}
