// src/lib.rs
// Public library surface for integration tests (and the fetch binary).

pub mod config;
pub mod mast;
pub mod output;
pub mod whitelist;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::config::FetchConfig;
pub use crate::mast::client::MastClient;
pub use crate::mast::types::{ArchiveClient, ObsKey, ObservationRecord};
pub use crate::mast::{dedup_records, fetch_window, FetchFailure};
pub use crate::output::{write_envelope, ResultEnvelope};
pub use crate::whitelist::{normalize_target, TargetWhitelist};
pub use crate::window::{to_mjd, MjdRange, TimeSlice, TimeWindow};
