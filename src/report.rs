//! Plain-text report of Hu vectors.
//!
//! Layout:
//!
//! ```text
//! Imagem Referencia: 
//! <reference label> <I1> ... <I7>
//! Imagens do Banco:
//! <label> <I1> ... <I7> 
//! ```
//!
//! Candidate lines end with a space before the newline. Values are rounded
//! to single precision and written as shortest round-trip decimal text,
//! switching to scientific notation outside `[1e-3, 1e7)`.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::batch::{BatchReport, ResultRow};
use crate::hu::{HuVector, HU_LEN};
use crate::util::format::format_value;
use crate::util::{HuError, HuResult};

/// First line of every report.
pub const REFERENCE_HEADER: &str = "Imagem Referencia: ";
/// Line separating the reference block from the candidate rows.
pub const BANK_HEADER: &str = "Imagens do Banco:";
/// Default report file name.
pub const DEFAULT_REPORT_NAME: &str = "ImageMoments.txt";

/// Writes the report to any byte sink.
pub fn write_report<W: Write>(report: &BatchReport, out: &mut W) -> HuResult<()> {
    writeln!(out, "{REFERENCE_HEADER}")?;
    writeln!(out, "{}", row_text(report.reference()))?;
    writeln!(out, "{BANK_HEADER}")?;
    for row in report.search_rows() {
        writeln!(out, "{} ", row_text(row))?;
    }
    out.flush()?;
    Ok(())
}

/// Renders the report into a string.
pub fn render_report(report: &BatchReport) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_report(report, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Writes the report to `path`.
///
/// The text goes to a sibling temporary file that is renamed over `path`
/// once complete, so `path` never holds a partial report.
pub fn save_report<P: AsRef<Path>>(report: &BatchReport, path: P) -> HuResult<()> {
    let path = path.as_ref();
    let tmp = temp_path(path);
    let result = (|| -> HuResult<()> {
        let file = fs::File::create(&tmp)?;
        let mut out = BufWriter::new(file);
        write_report(report, &mut out)?;
        let file = out.into_inner().map_err(|err| HuError::Io {
            reason: err.error().to_string(),
        })?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Parses report text back into rows.
///
/// Values are read at the single precision they were written with. Skip
/// information is not stored in the text, so the returned report has no
/// skipped entries.
pub fn parse_report(text: &str) -> HuResult<BatchReport> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (line_no, header) = lines.next().ok_or(HuError::ReportFormat {
        line: 1,
        reason: "empty report".to_string(),
    })?;
    if header.trim_end() != REFERENCE_HEADER.trim_end() {
        return Err(format_error(line_no, "missing reference header"));
    }

    let (line_no, reference) = lines
        .next()
        .ok_or_else(|| format_error(line_no + 1, "missing reference row"))?;
    let reference = parse_row(line_no, reference)?;

    let (line_no, bank) = lines
        .next()
        .ok_or_else(|| format_error(line_no + 1, "missing candidate header"))?;
    if bank.trim_end() != BANK_HEADER {
        return Err(format_error(line_no, "missing candidate header"));
    }

    let rows = lines
        .map(|(line_no, line)| parse_row(line_no, line))
        .collect::<HuResult<Vec<_>>>()?;
    Ok(BatchReport::new(reference, rows, Vec::new()))
}

fn row_text(row: &ResultRow) -> String {
    let mut text = row.label.clone();
    for value in row.hu.iter() {
        text.push(' ');
        text.push_str(&format_value(value));
    }
    text
}

// The label may itself contain spaces; the last seven tokens are the values.
fn parse_row(line_no: usize, line: &str) -> HuResult<ResultRow> {
    let line = line.trim_end();
    let mut values = [0.0f64; HU_LEN];
    let mut rest = line;
    for slot in values.iter_mut().rev() {
        let (head, token) = rest
            .rsplit_once(' ')
            .ok_or_else(|| format_error(line_no, "expected a label and seven values"))?;
        let value = token
            .parse::<f32>()
            .map_err(|err| format_error(line_no, &format!("bad value {token:?}: {err}")))?;
        *slot = f64::from(value);
        rest = head;
    }
    if rest.is_empty() {
        return Err(format_error(line_no, "missing label"));
    }
    Ok(ResultRow::new(rest, HuVector::new(values)))
}

fn format_error(line: usize, reason: &str) -> HuError {
    HuError::ReportFormat {
        line,
        reason: reason.to_string(),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_REPORT_NAME.into());
    name.push(".tmp");
    path.with_file_name(name)
}
