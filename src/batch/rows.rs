use std::fmt;

use crate::hu::HuVector;
use crate::util::{HuError, HuResult};

/// A labeled Hu vector. Labels need not be unique.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub label: String,
    pub hu: HuVector,
}

impl ResultRow {
    /// Creates a row.
    pub fn new(label: impl Into<String>, hu: HuVector) -> Self {
        Self {
            label: label.into(),
            hu,
        }
    }
}

/// Why a candidate entry produced no row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is a directory.
    Directory,
    /// The entry name is in the configured skip list.
    SkipName,
    /// The entry could not be decoded.
    Decode(String),
    /// The mask has no foreground pixels.
    Degenerate,
}

impl SkipReason {
    /// True for skips caused by bad input rather than by filtering.
    pub fn is_failure(&self) -> bool {
        matches!(self, SkipReason::Decode(_) | SkipReason::Degenerate)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Directory => f.write_str("directory"),
            SkipReason::SkipName => f.write_str("skip-listed name"),
            SkipReason::Decode(reason) => write!(f, "decode failed: {reason}"),
            SkipReason::Degenerate => f.write_str("no foreground pixels"),
        }
    }
}

/// A candidate entry that was not turned into a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: SkipReason,
}

/// Ordered result of a batch run: the reference row, then one row per
/// processed candidate in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    reference: ResultRow,
    rows: Vec<ResultRow>,
    skipped: Vec<SkippedEntry>,
}

impl BatchReport {
    /// Assembles a report from its parts.
    pub fn new(reference: ResultRow, rows: Vec<ResultRow>, skipped: Vec<SkippedEntry>) -> Self {
        Self {
            reference,
            rows,
            skipped,
        }
    }

    /// Returns the reference row.
    pub fn reference(&self) -> &ResultRow {
        &self.reference
    }

    /// Returns the candidate rows in processing order.
    pub fn search_rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Returns the reference row followed by every candidate row.
    pub fn rows(&self) -> impl Iterator<Item = &ResultRow> + '_ {
        std::iter::once(&self.reference).chain(self.rows.iter())
    }

    /// Returns the entries that produced no row.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// True when no candidate produced a row.
    pub fn is_empty_search(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fails with [`HuError::EmptyDirectory`] when no candidate produced a row.
    pub fn require_search_rows(&self, search_dir: &str) -> HuResult<()> {
        if self.is_empty_search() {
            return Err(HuError::EmptyDirectory {
                path: search_dir.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the candidate row nearest to the reference and its distance.
    ///
    /// Ties keep the earliest row.
    pub fn closest_match(&self) -> Option<(&ResultRow, f64)> {
        let mut best: Option<(&ResultRow, f64)> = None;
        for row in &self.rows {
            let dist = row.hu.distance(&self.reference.hu);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((row, dist));
            }
        }
        best
    }
}
