use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::DbConfig;

pub const DEFAULT_CSV: &str = "vea_2025_results.csv";

pub async fn run_load(csv: &Path) -> Result<()> {
    // Settings first: a bad configuration stops us before any file or DB work.
    let cfg = DbConfig::from_env()?;
    tracing::debug!(?cfg, "database settings");

    if !csv.exists() {
        bail!("CSV file '{}' not found.", csv.display());
    }

    let outcome = vea_load::load_csv(&cfg.database_url(), &cfg.table, csv)
        .await
        .with_context(|| format!("loading {} into `{}`", csv.display(), cfg.table))?;

    println!("Loaded {} rows into `{}`.", outcome.rows, outcome.table);
    Ok(())
}
