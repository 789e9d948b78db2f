//! Hu moment shape descriptors for binary masks.
//!
//! The pipeline runs raw moments, centroid, central moments, scale-normalized
//! moments and finally the seven Hu invariants. A batch runner evaluates one
//! reference mask and an ordered list of candidates, and the report module
//! serializes the labeled vectors to plain text. Decoding from disk is
//! available with the `image-io` feature and candidate evaluation can run on
//! rayon with the `rayon` feature.

pub mod batch;
pub mod hu;
pub mod image;
pub mod moments;
pub mod report;
#[cfg(feature = "image-io")]
pub mod source;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use batch::{
    BatchConfig, BatchReport, BatchRunner, BatchState, CandidateEntry, ResultRow, SkipReason,
    SkippedEntry,
};
pub use hu::{HuInvariantCalculator, HuVector, HU_LEN};
pub use crate::image::{BinaryImage, BinaryView, PixelSource};
pub use moments::{hu_moments, Centroid, MomentEngine, NormalizedMoments};
pub use report::{parse_report, render_report, save_report, write_report};
pub use util::{HuError, HuResult};
