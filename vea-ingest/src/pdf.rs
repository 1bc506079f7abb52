//! Report text from PDF pages.
//!
//! `lopdf`'s own `Document::extract_text` ends a line at every `ET`, so a
//! table row whose cells are placed one by one comes out one cell per line.
//! Here every text-showing operator is positioned through the text and
//! graphics matrices, and fragments that share a baseline are joined left to
//! right into one line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, Encoding, Object, ObjectId};
use thiserror::Error;

/// Baselines closer than this, in points, sit on the same line.
const LINE_TOLERANCE: f32 = 2.0;

/// `TJ` adjustments below this (thousandths of an em) are word gaps.
const TJ_SPACE_THRESHOLD: f32 = -100.0;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to load PDF {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("failed to extract text from page {page}: {source}")]
    Page {
        page: u32,
        #[source]
        source: lopdf::Error,
    },
}

/// Text of every page in page order, one visual line per text line and a
/// newline after each page.
pub fn extract_pdf_text(path: impl AsRef<Path>) -> Result<String, PdfError> {
    let path = path.as_ref();
    let doc = Document::load(path).map_err(|source| PdfError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let pages = doc.get_pages();
    tracing::debug!(path = %path.display(), pages = pages.len(), "loaded report");

    let mut text = String::new();
    // get_pages is a BTreeMap keyed by page number, so this walks in page order.
    for (page, page_id) in pages {
        let lines = page_lines(&doc, page_id).map_err(|source| PdfError::Page { page, source })?;
        text.push_str(&lines.join("\n"));
        text.push('\n');
    }
    Ok(text)
}

/// Affine transform `[a b c d e f]` in PDF row-vector form.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translate(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    fn from_operands(operands: &[Object]) -> lopdf::Result<Self> {
        let mut m = [0.0; 6];
        for (i, slot) in m.iter_mut().enumerate() {
            *slot = number(operands, i)?;
        }
        Ok(Matrix(m))
    }

    /// `self` first, then `next`.
    fn then(self, next: Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = next.0;
        Matrix([
            a * a2 + b * c2,
            a * b2 + b * d2,
            c * a2 + d * c2,
            c * b2 + d * d2,
            e * a2 + f * c2 + e2,
            e * b2 + f * d2 + f2,
        ])
    }

    fn origin(self) -> (f32, f32) {
        (self.0[4], self.0[5])
    }
}

/// Text drawn from one starting point with no repositioning in between.
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    x: f32,
    y: f32,
    text: String,
}

#[derive(Debug)]
struct TextLayout {
    ctm: Matrix,
    saved: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    leading: f32,
    run: Option<Fragment>,
    fragments: Vec<Fragment>,
}

impl TextLayout {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            leading: 0.0,
            run: None,
            fragments: Vec::new(),
        }
    }

    fn end_run(&mut self) {
        if let Some(run) = self.run.take() {
            if !run.text.trim().is_empty() {
                self.fragments.push(run);
            }
        }
    }

    fn move_to(&mut self, line_matrix: Matrix) {
        self.end_run();
        self.tlm = line_matrix;
        self.tm = line_matrix;
    }

    fn next_line(&mut self) {
        self.move_to(Matrix::translate(0.0, -self.leading).then(self.tlm));
    }

    fn show(&mut self, encoding: Option<&Encoding>, operands: &[Object]) -> lopdf::Result<()> {
        let Some(encoding) = encoding else {
            tracing::debug!("text shown before any font was selected");
            return Ok(());
        };
        let (x, y) = self.tm.then(self.ctm).origin();
        let run = self.run.get_or_insert_with(|| Fragment {
            x,
            y,
            text: String::new(),
        });
        collect_text(&mut run.text, encoding, operands)
    }

    /// Fragments grouped into lines, top of the page first, each line read
    /// left to right.
    fn into_lines(mut self) -> Vec<String> {
        self.end_run();
        let mut fragments = self.fragments;
        // Stable, so fragments on one baseline keep content order for equal x.
        fragments.sort_by(|a, b| b.y.total_cmp(&a.y));

        let mut lines: Vec<Vec<Fragment>> = Vec::new();
        for fragment in fragments {
            match lines.last_mut() {
                Some(line) if (line[0].y - fragment.y).abs() <= LINE_TOLERANCE => line.push(fragment),
                _ => lines.push(vec![fragment]),
            }
        }

        lines
            .into_iter()
            .map(|mut line| {
                line.sort_by(|a, b| a.x.total_cmp(&b.x));
                line.iter()
                    .map(|f| f.text.trim())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

fn page_lines(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let encodings = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, font)| font.get_font_encoding(doc).map(|encoding| (name, encoding)))
        .collect::<lopdf::Result<BTreeMap<Vec<u8>, Encoding>>>()?;
    let content = doc.get_and_decode_page_content(page_id)?;

    let mut layout = TextLayout::new();
    let mut encoding = None;

    for operation in &content.operations {
        let operands = operation.operands.as_slice();
        match operation.operator.as_str() {
            "q" => layout.saved.push(layout.ctm),
            "Q" => layout.ctm = layout.saved.pop().unwrap_or(Matrix::IDENTITY),
            "cm" => layout.ctm = Matrix::from_operands(operands)?.then(layout.ctm),
            "BT" => layout.move_to(Matrix::IDENTITY),
            "ET" => layout.end_run(),
            "Tf" => {
                let font = operands
                    .first()
                    .ok_or_else(|| lopdf::Error::Syntax("missing font operand".to_string()))?
                    .as_name()?;
                encoding = encodings.get(font);
            }
            "TL" => layout.leading = number(operands, 0)?,
            "Td" | "TD" => {
                let (tx, ty) = (number(operands, 0)?, number(operands, 1)?);
                if operation.operator == "TD" {
                    layout.leading = -ty;
                }
                layout.move_to(Matrix::translate(tx, ty).then(layout.tlm));
            }
            "Tm" => layout.move_to(Matrix::from_operands(operands)?),
            "T*" => layout.next_line(),
            "Tj" | "TJ" => layout.show(encoding, operands)?,
            "'" => {
                layout.next_line();
                layout.show(encoding, operands)?;
            }
            "\"" => {
                layout.next_line();
                layout.show(encoding, operands.get(2..).unwrap_or_default())?;
            }
            _ => {}
        }
    }

    Ok(layout.into_lines())
}

fn number(operands: &[Object], idx: usize) -> lopdf::Result<f32> {
    operands
        .get(idx)
        .ok_or_else(|| lopdf::Error::Syntax(format!("missing operand {idx}")))?
        .as_float()
}

fn collect_text(text: &mut String, encoding: &Encoding, operands: &[Object]) -> lopdf::Result<()> {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&Document::decode_text(encoding, bytes)?),
            Object::Array(items) => collect_text(text, encoding, items)?,
            Object::Integer(_) | Object::Real(_) => {
                if operand.as_float()? < TJ_SPACE_THRESHOLD {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_report;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};
    use tempfile::TempDir;

    /// One cell in its own text object at absolute position (x, y).
    fn cell(x: i64, y: i64, text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 9.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]
    }

    /// A table row with every whitespace-separated value placed separately.
    fn row(y: i64, text: &str) -> Vec<Operation> {
        text.split_whitespace()
            .zip((50..).step_by(45))
            .flat_map(|(value, x)| cell(x, y, value))
            .collect()
    }

    fn write_pdf(path: &Path, pages: Vec<Vec<Operation>>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = extract_pdf_text("/nonexistent/report.pdf").unwrap_err();
        assert!(matches!(err, PdfError::Load { .. }));
    }

    #[test]
    fn test_separately_placed_cells_form_one_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.pdf");
        let mut ops = cell(50, 760, "Veterinary Educational Assessment");
        ops.extend(row(700, "ICVA0001 Jane Q Public 15-MAY-2025 450 88 90 85 92 88 91"));
        ops.extend(row(686, "ICVA0002 John Smith 15-MAY-2025 398 71 70 75 66 72 73"));
        write_pdf(&path, vec![ops]);

        let text = extract_pdf_text(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Veterinary Educational Assessment",
                "ICVA0001 Jane Q Public 15-MAY-2025 450 88 90 85 92 88 91",
                "ICVA0002 John Smith 15-MAY-2025 398 71 70 75 66 72 73",
            ]
        );

        let records: Vec<_> = parse_report(&text).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].full_name, "Jane Q Public");
        assert_eq!(records[1].scores(), [398, 71, 70, 75, 66, 72, 73]);
    }

    #[test]
    fn test_lines_follow_position_not_drawing_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.pdf");
        // Lower row drawn first, and the score cells before the id.
        let mut ops = cell(300, 686, "2");
        ops.extend(cell(50, 686, "ICVA0002"));
        ops.extend(cell(300, 700, "1"));
        // Slightly raised cell still belongs to its row.
        ops.extend(cell(50, 701, "ICVA0001"));
        write_pdf(&path, vec![ops]);

        assert_eq!(extract_pdf_text(&path).unwrap(), "ICVA0001 1\nICVA0002 2\n");
    }

    #[test]
    fn test_text_matrix_leading_and_kerning() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.pdf");
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 9.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 50.into(), 700.into()]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("ICVA0001"),
                    (-250).into(),
                    Object::string_literal("Jane"),
                    (-20).into(),
                    Object::string_literal("t"),
                ])],
            ),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("Page 1 of 1")]),
            Operation::new("ET", vec![]),
        ];
        write_pdf(&path, vec![ops]);

        assert_eq!(extract_pdf_text(&path).unwrap(), "ICVA0001 Janet\nPage 1 of 1\n");
    }

    #[test]
    fn test_pages_join_in_order_with_newline_after_each() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.pdf");
        let mut first = row(700, "ICVA0001 Jane Q Public 15-MAY-2025 450 88 90 85 92 88 91");
        first.extend(cell(50, 40, "Page 1 of 2"));
        let mut second = row(700, "ICVA0002 John Smith 15-MAY-2025 398 71 70 75 66 72 73");
        second.extend(cell(50, 40, "Page 2 of 2"));
        write_pdf(&path, vec![first, second]);

        let text = extract_pdf_text(&path).unwrap();
        assert_eq!(
            text,
            "ICVA0001 Jane Q Public 15-MAY-2025 450 88 90 85 92 88 91\nPage 1 of 2\n\
             ICVA0002 John Smith 15-MAY-2025 398 71 70 75 66 72 73\nPage 2 of 2\n"
        );

        let ids: Vec<String> = parse_report(&text).map(|r| r.unwrap().id).collect();
        assert_eq!(ids, ["ICVA0001", "ICVA0002"]);
    }
}
