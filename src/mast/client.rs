// src/mast/client.rs
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::FetchConfig;
use crate::mast::retry::{call_with_retry, RetryPolicy};
use crate::mast::types::{ArchiveClient, ObservationRecord};
use crate::window::MjdRange;

/// Columns requested from the CAOM service, in output order.
pub const CAOM_COLUMNS: &str =
    "obs_collection,obsid,obs_id,proposal_id,instrument_name,target_name,t_min,t_max";

const CAOM_SERVICE: &str = "Mast.Caom.Filtered";
const COLLECTION: &str = "JWST";
const USER_AGENT: &str = concat!("jwst-exoplanet-fetcher/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the MAST invoke endpoint. One instance serves the whole
/// run; retries and the per-request timeout live here.
pub struct MastClient {
    http: Client,
    endpoint: String,
    timeout: Duration,
    page_size: u32,
    instruments: Option<Vec<String>>,
    retry: RetryPolicy,
}

impl MastClient {
    pub fn new(cfg: &FetchConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: cfg.api_url.clone(),
            timeout: cfg.timeout,
            page_size: cfg.page_size,
            instruments: cfg.instruments.clone(),
            retry: RetryPolicy::new(cfg.retries),
        }
    }

    fn build_query(&self, range: MjdRange, page: u32) -> CaomRequest {
        let mut filters = vec![
            CaomFilter {
                param_name: "obs_collection",
                values: FilterValues::Names(vec![COLLECTION.to_string()]),
            },
            // Overlap test: the observation starts before the slice ends
            // and ends after the slice starts.
            CaomFilter {
                param_name: "t_min",
                values: FilterValues::Range(vec![MjdBound {
                    min: None,
                    max: Some(range.end),
                }]),
            },
            CaomFilter {
                param_name: "t_max",
                values: FilterValues::Range(vec![MjdBound {
                    min: Some(range.start),
                    max: None,
                }]),
            },
        ];
        if let Some(instruments) = &self.instruments {
            if !instruments.is_empty() {
                filters.push(CaomFilter {
                    param_name: "instrument_name",
                    values: FilterValues::Names(instruments.clone()),
                });
            }
        }
        CaomRequest {
            service: CAOM_SERVICE,
            format: "json",
            params: CaomParams {
                columns: CAOM_COLUMNS,
                filters,
            },
            pagesize: self.page_size,
            page,
        }
    }

    /// One POST + decode, no retry. The invoke API takes the JSON query as
    /// a form-encoded `request` field.
    async fn invoke(&self, query: &CaomRequest) -> Result<Vec<ObservationRecord>> {
        let body = serde_json::to_string(query).context("encoding archive query")?;
        let resp = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json")
            .form(&[("request", body.as_str())])
            .send()
            .await
            .context("archive request")?
            .error_for_status()
            .context("archive status")?;
        let parsed: CaomResponse = resp.json().await.context("decoding archive response")?;
        Ok(parsed.into_rows())
    }
}

#[async_trait]
impl ArchiveClient for MastClient {
    async fn query_page(&self, range: MjdRange, page: u32) -> Result<Vec<ObservationRecord>> {
        let query = self.build_query(range, page);
        call_with_retry(self.retry, "archive query", || self.invoke(&query)).await
    }
}

#[derive(Debug, Serialize)]
struct CaomRequest {
    service: &'static str,
    format: &'static str,
    params: CaomParams,
    pagesize: u32,
    page: u32,
}

#[derive(Debug, Serialize)]
struct CaomParams {
    columns: &'static str,
    filters: Vec<CaomFilter>,
}

#[derive(Debug, Serialize)]
struct CaomFilter {
    #[serde(rename = "paramName")]
    param_name: &'static str,
    values: FilterValues,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum FilterValues {
    Names(Vec<String>),
    Range(Vec<MjdBound>),
}

#[derive(Debug, Serialize)]
struct MjdBound {
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CaomResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

impl CaomResponse {
    /// Rows from the `data` array; anything that is not an array of objects
    /// degrades to an empty page rather than an error.
    fn into_rows(self) -> Vec<ObservationRecord> {
        if let Some(status) = &self.status {
            if !status.eq_ignore_ascii_case("COMPLETE") {
                tracing::debug!(status = %status, "archive reported non-complete status");
            }
        }
        let items = match self.data {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        };
        let total = items.len();
        let rows: Vec<ObservationRecord> = items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        if rows.len() < total {
            tracing::debug!(dropped = total - rows.len(), "dropped malformed archive rows");
        }
        rows
    }
}
