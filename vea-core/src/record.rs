//! One candidate's result row from the VEA score report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of numeric fields that follow the test date on a report line.
pub const SCORE_COUNT: usize = 7;

/// A parsed exam result.
///
/// Field names map onto the extractor's CSV headers, so the struct can be
/// written and read back with `csv::Writer::serialize` / `Reader::deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    #[serde(rename = "ICVA ID")]
    pub id: String,

    #[serde(rename = "Full Name")]
    pub full_name: String,

    #[serde(rename = "Test Date", with = "crate::date_format")]
    pub test_date: NaiveDate,

    /// Total test, scaled.
    #[serde(rename = "Scale Score")]
    pub scale_score: i32,

    /// Total test, percent correct.
    #[serde(rename = "Total Percent Correct")]
    pub percent_correct: i32,

    #[serde(rename = "Anatomy")]
    pub anatomy: i32,

    #[serde(rename = "Physiology")]
    pub physiology: i32,

    #[serde(rename = "Pharmacology")]
    pub pharmacology: i32,

    #[serde(rename = "Microbiology")]
    pub microbiology: i32,

    #[serde(rename = "Pathology")]
    pub pathology: i32,
}

impl ExamRecord {
    /// Build a record from the seven trailing scores in report order.
    pub fn from_scores(
        id: impl Into<String>,
        full_name: impl Into<String>,
        test_date: NaiveDate,
        scores: [i32; SCORE_COUNT],
    ) -> Self {
        let [scale_score, percent_correct, anatomy, physiology, pharmacology, microbiology, pathology] =
            scores;
        Self {
            id: id.into(),
            full_name: full_name.into(),
            test_date,
            scale_score,
            percent_correct,
            anatomy,
            physiology,
            pharmacology,
            microbiology,
            pathology,
        }
    }

    /// The seven scores in report order.
    pub fn scores(&self) -> [i32; SCORE_COUNT] {
        [
            self.scale_score,
            self.percent_correct,
            self.anatomy,
            self.physiology,
            self.pharmacology,
            self.microbiology,
            self.pathology,
        ]
    }
}
