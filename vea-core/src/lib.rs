//! vea-core: the exam result record and the column catalogue shared by the
//! extractor and the loader.

pub mod column;
pub mod date_format;
pub mod record;

pub use column::{csv_headers, Column, ColumnKind};
pub use record::{ExamRecord, SCORE_COUNT};

/// Table the loader writes to when `DB_TABLE` is not set.
pub const DEFAULT_TABLE: &str = "vea_2025";
