// tests/fetch_pipeline.rs
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use jwst_exoplanet_fetcher::mast::fetch_window;
use jwst_exoplanet_fetcher::mast::types::{ArchiveClient, ObservationRecord};
use jwst_exoplanet_fetcher::whitelist::TargetWhitelist;
use jwst_exoplanet_fetcher::window::{MjdRange, TimeWindow};

fn row(obsid: u64, target: &str) -> ObservationRecord {
    serde_json::from_value(json!({ "obsid": obsid, "target_name": target })).unwrap()
}

/// Returns the same short page for every slice and records the queried
/// MJD ranges.
struct RepeatingArchive {
    calls: Mutex<Vec<(f64, f64, u32)>>,
}

#[async_trait]
impl ArchiveClient for RepeatingArchive {
    async fn query_page(&self, range: MjdRange, page: u32) -> Result<Vec<ObservationRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push((range.start, range.end, page));
        Ok(vec![row(1, "WASP-43 b"), row(2, "GJ 1214")])
    }
}

fn day_window() -> TimeWindow {
    let start: DateTime<Utc> = "2026-08-20T00:00:00Z".parse().unwrap();
    let end: DateTime<Utc> = "2026-08-21T00:00:00Z".parse().unwrap();
    TimeWindow::new(start, end)
}

#[tokio::test(start_paused = true)]
async fn filters_and_dedups_across_slices() {
    let archive = RepeatingArchive {
        calls: Mutex::new(Vec::new()),
    };
    let wl = TargetWhitelist::from_names(["wasp43", "wasp43b"]);

    let rows = fetch_window(&archive, &day_window(), &wl, 6.0, 80)
        .await
        .unwrap();

    // The same whitelisted row came back in all four slices; one survives.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target(), "WASP-43 b");
    assert_eq!(rows[0].obsid, Some(json!(1)));

    let calls = archive.calls.lock().unwrap();
    assert_eq!(calls.len(), 4);
    // Newest slice first, walking backward, contiguous in MJD.
    for pair in calls.windows(2) {
        assert!(pair[0].0 > pair[1].0);
        assert!((pair[0].0 - pair[1].1).abs() < 1e-9);
    }
    assert!(calls.iter().all(|c| c.2 == 1));
}

#[tokio::test(start_paused = true)]
async fn empty_whitelist_keeps_nothing() {
    let archive = RepeatingArchive {
        calls: Mutex::new(Vec::new()),
    };
    let wl = TargetWhitelist::default();

    let rows = fetch_window(&archive, &day_window(), &wl, 6.0, 80)
        .await
        .unwrap();

    assert!(rows.is_empty());
    // Pagination still ran over every slice.
    assert_eq!(archive.calls.lock().unwrap().len(), 4);
}
