//! Column catalogue: CSV header, table column and value kind for each field.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Text,
    Date,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    IcvaId,
    FullName,
    TestDate,
    ScaleScore,
    PercentCorrect,
    Anatomy,
    Physiology,
    Pharmacology,
    Microbiology,
    Pathology,
}

impl Column {
    /// Table order, which is also the extractor's CSV order.
    pub const ALL: [Column; 10] = [
        Column::IcvaId,
        Column::FullName,
        Column::TestDate,
        Column::ScaleScore,
        Column::PercentCorrect,
        Column::Anatomy,
        Column::Physiology,
        Column::Pharmacology,
        Column::Microbiology,
        Column::Pathology,
    ];

    /// Header written by the extractor.
    pub fn header(&self) -> &'static str {
        match self {
            Column::IcvaId => "ICVA ID",
            Column::FullName => "Full Name",
            Column::TestDate => "Test Date",
            Column::ScaleScore => "Scale Score",
            Column::PercentCorrect => "Total Percent Correct",
            Column::Anatomy => "Anatomy",
            Column::Physiology => "Physiology",
            Column::Pharmacology => "Pharmacology",
            Column::Microbiology => "Microbiology",
            Column::Pathology => "Pathology",
        }
    }

    /// Column name in the destination table.
    pub fn sql_name(&self) -> &'static str {
        match self {
            Column::IcvaId => "icva_id",
            Column::FullName => "full_name",
            Column::TestDate => "test_date",
            Column::ScaleScore => "vea_score",
            Column::PercentCorrect => "vea_percentage",
            Column::Anatomy => "vea_anatomy",
            Column::Physiology => "vea_physiology",
            Column::Pharmacology => "vea_pharmacology",
            Column::Microbiology => "vea_microbiology",
            Column::Pathology => "vea_pathology",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::IcvaId | Column::FullName => ColumnKind::Text,
            Column::TestDate => ColumnKind::Date,
            _ => ColumnKind::Integer,
        }
    }

    /// Resolve a CSV header. Accepts the extractor's header or the table
    /// column name, ignoring case and surrounding whitespace.
    pub fn from_header(header: &str) -> Option<Column> {
        let h = header.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.header().eq_ignore_ascii_case(h) || c.sql_name().eq_ignore_ascii_case(h))
    }
}

/// The extractor's CSV header row.
pub fn csv_headers() -> [&'static str; 10] {
    Column::ALL.map(|c| c.header())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_accepts_both_spellings() {
        assert_eq!(Column::from_header("ICVA ID"), Some(Column::IcvaId));
        assert_eq!(Column::from_header("icva_id"), Some(Column::IcvaId));
        assert_eq!(Column::from_header(" test date "), Some(Column::TestDate));
        assert_eq!(Column::from_header("VEA_PATHOLOGY"), Some(Column::Pathology));
        assert_eq!(Column::from_header("Total Percent Correct"), Some(Column::PercentCorrect));
        assert_eq!(Column::from_header("Notes"), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Column::IcvaId.kind(), ColumnKind::Text);
        assert_eq!(Column::TestDate.kind(), ColumnKind::Date);
        let ints = Column::ALL.iter().filter(|c| c.kind() == ColumnKind::Integer).count();
        assert_eq!(ints, 7);
    }

    #[test]
    fn test_csv_headers_order() {
        assert_eq!(
            csv_headers(),
            [
                "ICVA ID",
                "Full Name",
                "Test Date",
                "Scale Score",
                "Total Percent Correct",
                "Anatomy",
                "Physiology",
                "Pharmacology",
                "Microbiology",
                "Pathology",
            ]
        );
    }
}
