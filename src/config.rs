// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "MAST_API_URL";
pub const ENV_WHITELIST_PATH: &str = "MAST_WHITELIST_PATH";
pub const ENV_OUTPUT_PATH: &str = "MAST_OUTPUT_PATH";
pub const ENV_WINDOW_DAYS: &str = "MAST_WINDOW_DAYS";
pub const ENV_SLICE_HOURS: &str = "MAST_SLICE_HOURS";
pub const ENV_PAGE_SIZE: &str = "MAST_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "MAST_TIMEOUT_SECS";
pub const ENV_RETRIES: &str = "MAST_RETRIES";
pub const ENV_INSTRUMENTS: &str = "MAST_INSTRUMENTS";

pub const DEFAULT_API_URL: &str = "https://mast.stsci.edu/api/v0/invoke";
pub const DEFAULT_WHITELIST_PATH: &str = "assets/data/jwst_trexolists_extended.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "assets/data/mast_recent.json";
pub const DEFAULT_WINDOW_DAYS: f64 = 1.0;
pub const DEFAULT_SLICE_HOURS: f64 = 6.0;
pub const DEFAULT_PAGE_SIZE: u32 = 80;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_RETRIES: u32 = 8;
pub const DEFAULT_INSTRUMENTS: &str = "NIRCam,NIRSpec,NIRISS,MIRI,FGS";

/// Everything one fetch run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_url: String,
    pub whitelist_path: PathBuf,
    pub output_path: PathBuf,
    pub window_days: f64,
    pub slice_hours: f64,
    pub page_size: u32,
    pub timeout: Duration,
    pub retries: u32,
    /// `None` disables the instrument filter entirely.
    pub instruments: Option<Vec<String>>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            whitelist_path: PathBuf::from(DEFAULT_WHITELIST_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            window_days: DEFAULT_WINDOW_DAYS,
            slice_hours: DEFAULT_SLICE_HOURS,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            instruments: parse_instruments(DEFAULT_INSTRUMENTS),
        }
    }
}

impl FetchConfig {
    /// Resolve from the environment. Unparseable values fall back to the
    /// defaults rather than aborting a scheduled run.
    pub fn from_env() -> Self {
        Self {
            api_url: env_string(ENV_API_URL, DEFAULT_API_URL),
            whitelist_path: PathBuf::from(env_string(ENV_WHITELIST_PATH, DEFAULT_WHITELIST_PATH)),
            output_path: PathBuf::from(env_string(ENV_OUTPUT_PATH, DEFAULT_OUTPUT_PATH)),
            window_days: env_parse(ENV_WINDOW_DAYS, DEFAULT_WINDOW_DAYS),
            slice_hours: env_parse(ENV_SLICE_HOURS, DEFAULT_SLICE_HOURS),
            page_size: env_parse(ENV_PAGE_SIZE, DEFAULT_PAGE_SIZE).max(1),
            timeout: Duration::from_secs(env_parse(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)),
            retries: env_parse(ENV_RETRIES, DEFAULT_RETRIES),
            // An explicitly empty value means "no instrument filter", so it
            // must not fall back to the default list.
            instruments: match std::env::var(ENV_INSTRUMENTS) {
                Ok(raw) => parse_instruments(&raw),
                Err(_) => parse_instruments(DEFAULT_INSTRUMENTS),
            },
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma-separated instrument names, trimmed, empties dropped.
pub fn parse_instruments(raw: &str) -> Option<Vec<String>> {
    let list: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
