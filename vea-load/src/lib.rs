//! vea-load: load a results CSV into the destination table.
//!
//! The flow is read -> normalise dates -> ensure table -> one transactional
//! bulk insert. Duplicate primary keys are left to the database; one of them
//! aborts and rolls back the whole batch.

pub mod error;
pub mod frame;
pub mod insert;
pub mod schema;

use std::path::Path;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

pub use error::LoadError;
pub use frame::{Cell, Row, ScoreFrame};
pub use insert::insert_frame;
pub use schema::{create_table_sql, ensure_table, validate_table_name, Dialect};

/// What a successful load wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub table: String,
    pub rows: u64,
}

/// Open a single-connection pool for any supported URL (`mysql://`, `sqlite:`).
pub async fn connect(url: &str) -> Result<AnyPool, LoadError> {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new().max_connections(1).connect(url).await?;
    Ok(pool)
}

/// Create the table if needed and append every row of `frame`.
pub async fn load_frame(
    pool: &AnyPool,
    dialect: Dialect,
    table: &str,
    frame: &ScoreFrame,
) -> Result<u64, LoadError> {
    ensure_table(pool, table, dialect).await?;
    insert_frame(pool, table, frame).await
}

/// Full loader run against the database at `url`.
pub async fn load_csv(
    url: &str,
    table: &str,
    csv_path: impl AsRef<Path>,
) -> Result<LoadOutcome, LoadError> {
    validate_table_name(table)?;
    let dialect = Dialect::from_url(url)?;

    let mut frame = ScoreFrame::from_csv_path(csv_path)?;
    frame.normalize_dates()?;
    tracing::info!(rows = frame.len(), columns = frame.columns().len(), "read CSV");

    let pool = connect(url).await?;
    let result = load_frame(&pool, dialect, table, &frame).await;
    pool.close().await;

    Ok(LoadOutcome {
        table: table.to_string(),
        rows: result?,
    })
}
