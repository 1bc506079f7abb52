//! VEA score report parser (text)
//!
//! Expected extracted-text rows, one candidate per line, mixed in with page
//! headers and footers:
//!   ICVA0001   Jane Q Public   15-MAY-2025   450  88  90  85  92  88  91
//!
//! Columns after the date: scale score, percent correct, then anatomy,
//! physiology, pharmacology, microbiology and pathology sub-scores.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use vea_core::{date_format, ExamRecord, SCORE_COUNT};

/// Leading text of every data row in the report.
pub const SENTINEL_PREFIX: &str = "ICVA";

/// Candidates in the May 2025 report.
pub const EXPECTED_STUDENTS: usize = 107;

static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-[A-Z]{3}-\d{4}$").expect("date token pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,

    #[error("no test date found in line: {line}")]
    MissingDate { line: String },

    #[error("invalid test date {token:?} in line: {line}")]
    InvalidDate { line: String, token: String },

    #[error("expected 7 scores, got {found} in line: {line}")]
    ScoreCount { line: String, found: usize },

    #[error("invalid score {token:?} in line: {line}")]
    InvalidScore { line: String, token: String },
}

/// Lines of extracted text that carry a candidate row, trimmed.
pub fn data_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(SENTINEL_PREFIX))
}

/// Parse every data row of a report. One item per candidate line; a bad line
/// yields an `Err` and the iteration carries on.
pub fn parse_report(text: &str) -> impl Iterator<Item = Result<ExamRecord, ParseError>> + '_ {
    data_lines(text).map(parse_data_line)
}

/// Parse a single data row: `[id] [name tokens...] [date] [7 scores]`.
pub fn parse_data_line(line: &str) -> Result<ExamRecord, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((id, rest)) = tokens.split_first() else {
        return Err(ParseError::Empty);
    };

    // Name tokens run up to the first date-shaped token.
    let date_idx = rest
        .iter()
        .position(|t| DATE_TOKEN_RE.is_match(t))
        .ok_or_else(|| ParseError::MissingDate {
            line: line.to_string(),
        })?;

    let full_name = rest[..date_idx].join(" ");
    let date_token = rest[date_idx];
    let score_tokens = &rest[date_idx + 1..];

    if score_tokens.len() != SCORE_COUNT {
        return Err(ParseError::ScoreCount {
            line: line.to_string(),
            found: score_tokens.len(),
        });
    }

    let test_date = date_format::parse(date_token).map_err(|_| ParseError::InvalidDate {
        line: line.to_string(),
        token: date_token.to_string(),
    })?;

    let mut scores = [0i32; SCORE_COUNT];
    for (slot, token) in scores.iter_mut().zip(score_tokens) {
        *slot = token.parse().map_err(|_| ParseError::InvalidScore {
            line: line.to_string(),
            token: token.to_string(),
        })?;
    }

    Ok(ExamRecord::from_scores(*id, full_name, test_date, scores))
}

/// Outcome of a whole extraction run: good records plus the lines that failed.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub records: Vec<ExamRecord>,
    pub failures: Vec<ParseError>,
    pub expected: usize,
}

impl ExtractSummary {
    /// Drain per-line results. Failures are kept and logged at debug level;
    /// the caller reports the count.
    pub fn collect<I>(results: I, expected: usize) -> Self
    where
        I: IntoIterator<Item = Result<ExamRecord, ParseError>>,
    {
        let mut summary = Self {
            expected,
            ..Self::default()
        };

        for result in results {
            match result {
                Ok(record) => summary.records.push(record),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping report line");
                    summary.failures.push(e);
                }
            }
        }

        tracing::debug!(
            parsed = summary.records.len(),
            failed = summary.failures.len(),
            "report parsed"
        );
        summary
    }

    /// `Some((expected, parsed))` when the record count is off.
    pub fn discrepancy(&self) -> Option<(usize, usize)> {
        (self.records.len() != self.expected).then_some((self.expected, self.records.len()))
    }
}
