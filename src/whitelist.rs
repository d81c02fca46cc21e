// src/whitelist.rs
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Normalize a target name for whitelist comparison: lower-case, keep only
/// letters and digits. Idempotent, so archive names and catalog names can
/// both go through it ("WASP-43 b" and "wasp43b" collapse to the same key).
pub fn normalize_target(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Set of normalized exoplanet host and host+letter names.
#[derive(Debug, Clone, Default)]
pub struct TargetWhitelist {
    names: HashSet<String>,
}

impl TargetWhitelist {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| normalize_target(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// Load from the catalog CSV at `path`. A missing or unreadable file
    /// degrades to an empty whitelist with a warning; the fetch then runs
    /// but keeps nothing.
    pub fn load(path: &Path) -> Self {
        match Self::from_csv_path(path) {
            Ok(wl) => {
                tracing::info!(
                    count = wl.len(),
                    path = %path.display(),
                    "loaded target whitelist"
                );
                wl
            }
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    path = %path.display(),
                    "whitelist unavailable; continuing with empty set"
                );
                Self::default()
            }
        }
    }

    fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening whitelist {}", path.display()))?;
        Self::from_csv_reader(file)
    }

    /// Parse from any reader. Required logical column: `hostname_nn`;
    /// `letter_nn` is optional. Headers match case-insensitively.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = reader.headers().context("reading whitelist header row")?;
        let host_idx = find_column(headers, "hostname_nn")
            .context("whitelist has no hostname_nn column")?;
        let letter_idx = find_column(headers, "letter_nn");

        let mut names = HashSet::new();
        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = ?e, "skipping unreadable whitelist row");
                    continue;
                }
            };
            let host = record.get(host_idx).unwrap_or("");
            let key = normalize_target(host);
            if key.is_empty() {
                continue;
            }
            names.insert(key);
            // Planet entries need a single-letter designator; anything
            // longer is catalog noise.
            if let Some(idx) = letter_idx {
                let letter = record.get(idx).unwrap_or("");
                let mut chars = letter.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    if c.is_alphabetic() {
                        names.insert(normalize_target(&format!("{host}{c}")));
                    }
                }
            }
        }
        Ok(Self { names })
    }

    /// True when the archive's raw target name is on the whitelist.
    pub fn matches_target(&self, raw_name: &str) -> bool {
        self.names.contains(&normalize_target(raw_name))
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.names.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn find_column(headers: &csv::StringRecord, logical: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(logical))
}
