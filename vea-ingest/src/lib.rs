//! vea-ingest: score report ingestion (PDF text) and the report line parser.

pub mod csv_io;
pub mod parsers;
pub mod pdf;

pub use csv_io::{read_records, write_records};
pub use parsers::vea_report::{parse_data_line, parse_report, ExtractSummary, ParseError};
pub use pdf::{extract_pdf_text, PdfError};
