use anyhow::{bail, Context, Result};
use std::path::Path;
use vea_ingest::{extract_pdf_text, parse_report, write_records, ExtractSummary};

pub const DEFAULT_PDF: &str = "pdf/veamay2025_westernuniversity_icva044.PDF";
pub const DEFAULT_OUT: &str = "parsed_data.csv";

pub fn run_extract(pdf: &Path, out: &Path, expected: usize) -> Result<()> {
    if !pdf.exists() {
        bail!("PDF file '{}' not found.", pdf.display());
    }

    let text = extract_pdf_text(pdf).with_context(|| format!("reading {}", pdf.display()))?;
    let summary = ExtractSummary::collect(parse_report(&text), expected);

    if !summary.failures.is_empty() {
        println!(
            "Skipped {} malformed line(s) (RUST_LOG=debug to list them).",
            summary.failures.len()
        );
    }

    match summary.discrepancy() {
        Some((expected, parsed)) => {
            println!("Warning: Expected {expected} students, but parsed {parsed}.");
        }
        None => println!("Successfully parsed {} students.", summary.records.len()),
    }

    write_records(out, &summary.records)?;
    println!("Data saved to {}", out.display());

    Ok(())
}
