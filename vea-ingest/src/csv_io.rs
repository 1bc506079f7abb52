//! CSV output of extracted records (`parsed_data.csv`) and reading it back.

use std::path::Path;

use anyhow::{Context, Result};
use vea_core::{csv_headers, ExamRecord};

/// Write records under the fixed 10-column header. The header is written
/// even when `records` is empty.
pub fn write_records(path: impl AsRef<Path>, records: &[ExamRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    wtr.write_record(csv_headers())?;
    for record in records {
        wtr.serialize(record)
            .with_context(|| format!("writing {}", record.id))?;
    }
    wtr.flush().with_context(|| format!("flushing {}", path.display()))?;

    Ok(())
}

/// Read records previously written by [`write_records`].
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<ExamRecord>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut out = Vec::new();
    for result in rdr.deserialize() {
        let record: ExamRecord = result.with_context(|| format!("reading {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}
