//! Append-only bulk insert.
//!
//! All chunks run inside one transaction. Any failure, a duplicate id
//! included, drops the transaction and nothing from the batch is kept.

use sqlx::any::Any;
use sqlx::{AnyPool, QueryBuilder};

use crate::error::LoadError;
use crate::frame::{Cell, ScoreFrame};
use crate::schema::validate_table_name;

/// Rows per INSERT statement; 100 rows x 10 columns stays well under the
/// placeholder limits of MySQL and SQLite.
const CHUNK_ROWS: usize = 100;

pub async fn insert_frame(pool: &AnyPool, table: &str, frame: &ScoreFrame) -> Result<u64, LoadError> {
    validate_table_name(table)?;
    if frame.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for chunk in frame.rows().chunks(CHUNK_ROWS) {
        let mut qb: QueryBuilder<Any> = QueryBuilder::new(format!("INSERT INTO `{table}` ("));
        {
            let mut names = qb.separated(", ");
            for column in frame.columns() {
                names.push(format!("`{}`", column.sql_name()));
            }
        }
        qb.push(") ");

        qb.push_values(chunk, |mut b, row| {
            for cell in &row.cells {
                match cell {
                    Cell::Text(v) => {
                        b.push_bind(v.clone());
                    }
                    Cell::Integer(v) => {
                        b.push_bind(*v);
                    }
                    Cell::Date(v) => {
                        b.push_bind(v.map(|d| d.format("%Y-%m-%d").to_string()));
                    }
                }
            }
        });

        let result = qb.build().execute(&mut *tx).await.map_err(classify)?;
        inserted += result.rows_affected();
        tracing::debug!(rows = chunk.len(), first_line = chunk[0].line, "inserted chunk");
    }

    tx.commit().await?;
    tracing::info!(table, rows = inserted, "batch committed");
    Ok(inserted)
}

fn classify(err: sqlx::Error) -> LoadError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return LoadError::DuplicateKey(db.message().to_string());
        }
    }
    LoadError::Database(err)
}
