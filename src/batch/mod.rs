//! Batch evaluation of one reference mask against a list of candidates.
//!
//! The runner is a pure function of its inputs: a reference entry plus an
//! ordered sequence of candidate entries go in, an ordered [`BatchReport`]
//! comes out. Listing and decoding happen outside (see `source` with the
//! `image-io` feature), so tests drive the runner with in-memory masks.

use crate::image::PixelSource;
use crate::moments::hu_moments;
use crate::trace::{trace_event, trace_skip, trace_span};
use crate::util::{HuError, HuResult};

mod rows;

pub use rows::{BatchReport, ResultRow, SkipReason, SkippedEntry};

/// Name of the Windows thumbnail cache found in image folders.
pub const THUMBNAIL_CACHE: &str = "Thumbs.db";

/// One item of a directory listing, already classified by the caller.
#[derive(Clone, Debug)]
pub enum CandidateEntry<S> {
    /// A sub-directory; never processed.
    Directory { name: String },
    /// A decoded image.
    Image { name: String, image: S },
    /// A regular file that could not be decoded.
    Unreadable { name: String, reason: String },
}

impl<S> CandidateEntry<S> {
    /// Wraps a decoded image.
    pub fn image(name: impl Into<String>, image: S) -> Self {
        CandidateEntry::Image {
            name: name.into(),
            image,
        }
    }

    /// Returns the entry name as listed.
    pub fn name(&self) -> &str {
        match self {
            CandidateEntry::Directory { name }
            | CandidateEntry::Image { name, .. }
            | CandidateEntry::Unreadable { name, .. } => name,
        }
    }
}

/// Batch configuration.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Entry names that are never treated as images.
    pub skip_names: Vec<String>,
    /// Compare `skip_names` ignoring ASCII case.
    pub case_insensitive_skip: bool,
    /// Process candidates on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            skip_names: vec![THUMBNAIL_CACHE.to_string()],
            case_insensitive_skip: true,
            parallel: false,
        }
    }
}

impl BatchConfig {
    /// Returns true when `name` matches one of the skip names.
    pub fn is_skipped_name(&self, name: &str) -> bool {
        self.skip_names.iter().any(|skip| {
            if self.case_insensitive_skip {
                skip.eq_ignore_ascii_case(name)
            } else {
                skip == name
            }
        })
    }
}

/// Progress of a [`BatchRunner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    ProcessingReference,
    ProcessingEntry(usize),
    Done,
    Failed,
}

enum EntryOutcome {
    Row(ResultRow),
    Skipped(SkippedEntry),
}

/// Computes Hu vectors for a reference image and every candidate entry.
#[derive(Debug)]
pub struct BatchRunner {
    config: BatchConfig,
    state: BatchState,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}

impl BatchRunner {
    /// Creates an idle runner.
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            state: BatchState::Idle,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Returns the current state.
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Processes the reference, then each entry in order.
    ///
    /// Any reference failure aborts the run with [`HuError::Reference`] and
    /// leaves the runner in [`BatchState::Failed`]. Candidate failures only
    /// produce a [`SkippedEntry`].
    pub fn run<R, S, I>(
        &mut self,
        reference: CandidateEntry<R>,
        entries: I,
    ) -> HuResult<BatchReport>
    where
        R: PixelSource,
        S: PixelSource,
        I: IntoIterator<Item = CandidateEntry<S>>,
    {
        let _span = trace_span!("batch_run").entered();
        let reference = self.process_reference(reference)?;

        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            self.state = BatchState::ProcessingEntry(index);
            match process_entry(&self.config, entry) {
                EntryOutcome::Row(row) => rows.push(row),
                EntryOutcome::Skipped(skip) => skipped.push(skip),
            }
        }
        Ok(self.finish(reference, rows, skipped))
    }

    /// Like [`Self::run`], evaluating candidates on the rayon thread pool.
    ///
    /// Rows keep the input order.
    #[cfg(feature = "rayon")]
    pub fn run_parallel<R, S>(
        &mut self,
        reference: CandidateEntry<R>,
        entries: Vec<CandidateEntry<S>>,
    ) -> HuResult<BatchReport>
    where
        R: PixelSource,
        S: PixelSource + Send,
    {
        use rayon::prelude::*;

        let _span = trace_span!("batch_run", entries = entries.len()).entered();
        let reference = self.process_reference(reference)?;

        self.state = BatchState::ProcessingEntry(0);
        let config = &self.config;
        let outcomes: Vec<EntryOutcome> = entries
            .into_par_iter()
            .map(|entry| process_entry(config, entry))
            .collect();

        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                EntryOutcome::Row(row) => rows.push(row),
                EntryOutcome::Skipped(skip) => skipped.push(skip),
            }
        }
        Ok(self.finish(reference, rows, skipped))
    }

    fn process_reference<R: PixelSource>(
        &mut self,
        reference: CandidateEntry<R>,
    ) -> HuResult<ResultRow> {
        self.state = BatchState::ProcessingReference;
        let name = reference.name().to_string();
        let result = match reference {
            CandidateEntry::Image { image, .. } => hu_moments(image),
            CandidateEntry::Directory { .. } => Err(HuError::Decode {
                name: name.clone(),
                reason: "is a directory".to_string(),
            }),
            CandidateEntry::Unreadable { reason, .. } => Err(HuError::Decode {
                name: name.clone(),
                reason,
            }),
        };
        match result {
            Ok(hu) => Ok(ResultRow { label: name, hu }),
            Err(err) => {
                self.state = BatchState::Failed;
                Err(HuError::Reference {
                    name,
                    source: Box::new(err),
                })
            }
        }
    }

    fn finish(
        &mut self,
        reference: ResultRow,
        rows: Vec<ResultRow>,
        skipped: Vec<SkippedEntry>,
    ) -> BatchReport {
        self.state = BatchState::Done;
        trace_event!("batch_done", rows = rows.len(), skipped = skipped.len());
        BatchReport::new(reference, rows, skipped)
    }
}

fn process_entry<S: PixelSource>(config: &BatchConfig, entry: CandidateEntry<S>) -> EntryOutcome {
    if config.is_skipped_name(entry.name()) {
        return skip(entry.name(), SkipReason::SkipName);
    }
    match entry {
        CandidateEntry::Directory { name } => skip(&name, SkipReason::Directory),
        CandidateEntry::Unreadable { name, reason } => skip(&name, SkipReason::Decode(reason)),
        CandidateEntry::Image { name, image } => match hu_moments(image) {
            Ok(hu) => EntryOutcome::Row(ResultRow::new(name, hu)),
            Err(HuError::DegenerateImage) => skip(&name, SkipReason::Degenerate),
            Err(err) => skip(&name, SkipReason::Decode(err.to_string())),
        },
    }
}

fn skip(name: &str, reason: SkipReason) -> EntryOutcome {
    if reason.is_failure() {
        let detail = reason.to_string();
        trace_skip!("batch_entry_skipped", entry = name, reason = detail.as_str());
    }
    EntryOutcome::Skipped(SkippedEntry {
        name: name.to_string(),
        reason,
    })
}
