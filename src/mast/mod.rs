// src/mast/mod.rs
pub mod client;
pub mod retry;
pub mod types;

use std::collections::HashSet;
use std::time::Duration;

use crate::mast::types::{ArchiveClient, ObsKey, ObservationRecord};
use crate::whitelist::TargetWhitelist;
use crate::window::{format_utc, TimeWindow};

/// Courtesy pause between slices so the archive is not hammered.
const SLICE_PAUSE: Duration = Duration::from_millis(300);

/// A failed fetch still hands back whatever survived filtering and dedup
/// before the failing call, so the writer can salvage it.
#[derive(Debug)]
pub struct FetchFailure {
    pub partial: Vec<ObservationRecord>,
    pub reason: anyhow::Error,
}

/// Walk the window newest-first, paginating every slice until a short page,
/// keeping only whitelisted targets. Rows come back deduplicated in
/// first-seen order.
pub async fn fetch_window<C: ArchiveClient>(
    client: &C,
    window: &TimeWindow,
    whitelist: &TargetWhitelist,
    slice_hours: f64,
    page_size: u32,
) -> Result<Vec<ObservationRecord>, FetchFailure> {
    // A page size of 0 would make every page look full.
    let page_size = page_size.max(1);
    let slices = window.slices(slice_hours);
    let mut acc: Vec<ObservationRecord> = Vec::new();

    for (i, slice) in slices.iter().enumerate() {
        tracing::info!(
            slice = i + 1,
            total = slices.len(),
            from = %format_utc(slice.start),
            to = %format_utc(slice.end),
            "querying archive slice"
        );
        let range = slice.mjd_range();
        let mut page: u32 = 1;
        loop {
            let rows = match client.query_page(range, page).await {
                Ok(rows) => rows,
                Err(e) => {
                    return Err(FetchFailure {
                        partial: dedup_records(acc),
                        reason: e.context(format!(
                            "archive fetch failed in slice {}/{}, page {}",
                            i + 1,
                            slices.len(),
                            page
                        )),
                    });
                }
            };

            let fetched = rows.len();
            let mut kept = 0usize;
            for row in rows {
                if whitelist.matches_target(row.target()) {
                    acc.push(row);
                    kept += 1;
                }
            }
            tracing::debug!(page, fetched, kept, "archive page");

            // A full page may have more behind it; a short one is the end.
            if fetched < page_size as usize {
                break;
            }
            page += 1;
        }

        if i + 1 < slices.len() {
            tokio::time::sleep(SLICE_PAUSE).await;
        }
    }

    Ok(dedup_records(acc))
}

/// Drop duplicate records by identity key, keeping first-seen order.
pub fn dedup_records(rows: Vec<ObservationRecord>) -> Vec<ObservationRecord> {
    let mut seen: HashSet<ObsKey> = HashSet::new();
    let mut uniq = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row.identity()) {
            uniq.push(row);
        }
    }
    uniq
}
