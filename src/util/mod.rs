//! Shared utility helpers.

pub mod error;
pub(crate) mod format;

pub use error::{HuError, HuResult};
