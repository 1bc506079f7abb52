//! Destination table DDL.

use sqlx::AnyPool;
use vea_core::{Column, ColumnKind};

use crate::error::LoadError;

/// SQL flavour, picked from the connection URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> Result<Self, LoadError> {
        let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            _ => Err(LoadError::UnsupportedUrl(scheme)),
        }
    }
}

/// Table names are spliced into SQL, so keep them to `[A-Za-z0-9_]`.
pub fn validate_table_name(name: &str) -> Result<(), LoadError> {
    let ok = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(LoadError::InvalidTableName(name.to_string()))
    }
}

fn sql_type(column: Column) -> &'static str {
    match (column, column.kind()) {
        (Column::IcvaId, _) => "VARCHAR(12) NOT NULL PRIMARY KEY",
        (_, ColumnKind::Text) => "VARCHAR(100)",
        (_, ColumnKind::Date) => "DATE",
        (_, ColumnKind::Integer) => "INT",
    }
}

pub fn create_table_sql(table: &str, dialect: Dialect) -> String {
    let columns = Column::ALL
        .iter()
        .map(|c| format!("    `{}` {}", c.sql_name(), sql_type(*c)))
        .collect::<Vec<_>>()
        .join(",\n");

    let charset = match dialect {
        Dialect::MySql => " CHARACTER SET utf8mb4",
        // SQLite text is always Unicode.
        Dialect::Sqlite => "",
    };

    format!("CREATE TABLE IF NOT EXISTS `{table}` (\n{columns}\n){charset}")
}

pub async fn ensure_table(pool: &AnyPool, table: &str, dialect: Dialect) -> Result<(), LoadError> {
    validate_table_name(table)?;
    sqlx::query(&create_table_sql(table, dialect))
        .execute(pool)
        .await?;
    tracing::debug!(table, "table ensured");
    Ok(())
}
