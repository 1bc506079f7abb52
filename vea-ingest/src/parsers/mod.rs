//! Report-specific text parsers.

pub mod vea_report;
