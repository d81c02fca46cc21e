//! # Time Window
//! UTC window construction and slicing for archive queries.
//!
//! The fetch window ends "now" (truncated to whole seconds) and is walked
//! backward in fixed-length slices so each archive request stays small.
//! Slices are clamped at the window start; the count is
//! ceil(window / slice), minimum one.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// MJD of 1970-01-01T00:00:00Z.
pub const MJD_UNIX_EPOCH: f64 = 40_587.0;
const SECS_PER_DAY: f64 = 86_400.0;
const SECS_PER_HOUR: f64 = 3_600.0;

/// Convert a UTC instant to Modified Julian Date, the time scale the
/// archive's `t_min`/`t_max` filters speak.
pub fn to_mjd(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 / SECS_PER_DAY + MJD_UNIX_EPOCH
}

/// ISO-8601 UTC with trailing `Z`, whole seconds.
pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One sub-interval of the window, queried independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSlice {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Slice bounds in the archive's time scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MjdRange {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window of `days` (fractional ok) ending at the current UTC second.
    pub fn ending_now(days: f64) -> Self {
        let end = Utc::now().trunc_subsecs(0);
        let span = Duration::seconds((days * SECS_PER_DAY).round().max(0.0) as i64);
        Self {
            start: end - span,
            end,
        }
    }

    /// Newest-first slices covering the window contiguously. The last slice
    /// is clamped so it never extends before `start`; a degenerate or
    /// non-positive step yields a single slice over the whole window.
    pub fn slices(&self, slice_hours: f64) -> Vec<TimeSlice> {
        let step_secs = (slice_hours * SECS_PER_HOUR).round() as i64;
        if step_secs <= 0 {
            return vec![TimeSlice {
                start: self.start,
                end: self.end,
            }];
        }
        let step = Duration::seconds(step_secs);

        let mut out = Vec::new();
        let mut hi = self.end;
        while hi > self.start {
            let lo = std::cmp::max(self.start, hi - step);
            out.push(TimeSlice { start: lo, end: hi });
            hi = lo;
        }
        if out.is_empty() {
            out.push(TimeSlice {
                start: self.start,
                end: self.end,
            });
        }
        out
    }
}

impl TimeSlice {
    pub fn mjd_range(&self) -> MjdRange {
        MjdRange {
            start: to_mjd(self.start),
            end: to_mjd(self.end),
        }
    }
}
