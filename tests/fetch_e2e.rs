// tests/fetch_e2e.rs
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use jwst_exoplanet_fetcher::mast::fetch_window;
use jwst_exoplanet_fetcher::mast::types::{ArchiveClient, ObservationRecord};
use jwst_exoplanet_fetcher::output::{write_envelope, ResultEnvelope};
use jwst_exoplanet_fetcher::whitelist::TargetWhitelist;
use jwst_exoplanet_fetcher::window::{MjdRange, TimeWindow};

fn row(obsid: u64, target: &str) -> ObservationRecord {
    serde_json::from_value(json!({ "obsid": obsid, "target_name": target })).unwrap()
}

fn day_window() -> TimeWindow {
    let start: DateTime<Utc> = "2026-08-20T00:00:00Z".parse().unwrap();
    let end: DateTime<Utc> = "2026-08-21T00:00:00Z".parse().unwrap();
    TimeWindow::new(start, end)
}

struct MixedTargetsArchive;

#[async_trait]
impl ArchiveClient for MixedTargetsArchive {
    async fn query_page(&self, _range: MjdRange, _page: u32) -> Result<Vec<ObservationRecord>> {
        Ok(vec![row(1, "WASP-43b"), row(2, "GJ1214")])
    }
}

/// First slice delivers one good page, every later call fails.
struct FailsAfterFirstSlice {
    calls: Mutex<u32>,
}

#[async_trait]
impl ArchiveClient for FailsAfterFirstSlice {
    async fn query_page(&self, _range: MjdRange, _page: u32) -> Result<Vec<ObservationRecord>> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls == 1 {
            Ok(vec![row(7, "WASP-43b")])
        } else {
            Err(anyhow!("connection reset by peer"))
        }
    }
}

#[tokio::test(start_paused = true)]
async fn snapshot_contains_only_whitelisted_rows() {
    let wl = TargetWhitelist::from_names(["wasp43", "wasp43b"]);
    let window = day_window();

    let rows = fetch_window(&MixedTargetsArchive, &window, &wl, 6.0, 80)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].obsid, Some(json!(1)));

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("snapshots/mast.json");
    write_envelope(&path, &ResultEnvelope::new(&window, rows, None)).unwrap();

    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(body["jwst"].as_array().unwrap().len(), 1);
    assert_eq!(body["jwst"][0]["obsid"], json!(1));
    assert_eq!(body["jwst"][0]["target_name"], "WASP-43b");
    assert_eq!(body["window_utc"][0], "2026-08-20T00:00:00Z");
    assert_eq!(body["window_utc"][1], "2026-08-21T00:00:00Z");
    assert!(body.get("jwst_error").is_none());
    assert!(body["generated_utc"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_still_writes_partial_snapshot() {
    let wl = TargetWhitelist::from_names(["wasp43", "wasp43b"]);
    let window = day_window();
    let archive = FailsAfterFirstSlice {
        calls: Mutex::new(0),
    };

    let failure = fetch_window(&archive, &window, &wl, 6.0, 80)
        .await
        .unwrap_err();
    assert_eq!(failure.partial.len(), 1);
    assert_eq!(failure.partial[0].obsid, Some(json!(7)));

    let message = format!("{:#}", failure.reason);
    assert!(message.contains("slice 2/4"));
    assert!(message.contains("connection reset by peer"));

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("mast.json");
    write_envelope(
        &path,
        &ResultEnvelope::new(&window, failure.partial, Some(message)),
    )
    .unwrap();

    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(body["jwst"].as_array().unwrap().len(), 1);
    assert!(body["jwst_error"]
        .as_str()
        .unwrap()
        .contains("connection reset by peer"));
}
