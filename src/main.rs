//! JWST exoplanet fetch — binary entrypoint.
//! Pulls recent JWST observation metadata from the MAST archive, keeps rows
//! matching the local exoplanet target whitelist, and writes the snapshot
//! JSON consumed by the site.
//!
//! Meant to run under an external scheduler; a failed fetch is recorded in
//! the snapshot (`jwst_error`), not in the exit code.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jwst_exoplanet_fetcher::config::FetchConfig;
use jwst_exoplanet_fetcher::mast::client::MastClient;
use jwst_exoplanet_fetcher::mast::fetch_window;
use jwst_exoplanet_fetcher::output::{write_envelope, ResultEnvelope};
use jwst_exoplanet_fetcher::whitelist::TargetWhitelist;
use jwst_exoplanet_fetcher::window::TimeWindow;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = FetchConfig::from_env();
    tracing::info!(
        window_days = cfg.window_days,
        slice_hours = cfg.slice_hours,
        page_size = cfg.page_size,
        retries = cfg.retries,
        "starting JWST exoplanet fetch"
    );

    let whitelist = TargetWhitelist::load(&cfg.whitelist_path);
    let window = TimeWindow::ending_now(cfg.window_days);
    let client = MastClient::new(&cfg);

    let envelope =
        match fetch_window(&client, &window, &whitelist, cfg.slice_hours, cfg.page_size).await {
            Ok(rows) => {
                tracing::info!(rows = rows.len(), "archive fetch complete");
                ResultEnvelope::new(&window, rows, None)
            }
            Err(failure) => {
                tracing::error!(
                    error = ?failure.reason,
                    salvaged = failure.partial.len(),
                    "archive fetch failed; writing partial snapshot"
                );
                let message = format!("{:#}", failure.reason);
                ResultEnvelope::new(&window, failure.partial, Some(message))
            }
        };

    write_envelope(&cfg.output_path, &envelope)?;
    tracing::info!(
        path = %cfg.output_path.display(),
        rows = envelope.jwst.len(),
        "wrote snapshot"
    );
    Ok(())
}
