use super::MomentEngine;
use crate::image::PixelSource;
use crate::util::HuResult;

/// Scale-normalized central moments of orders two and three.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NormalizedMoments {
    pub mu20: f64,
    pub mu02: f64,
    pub mu11: f64,
    pub mu30: f64,
    pub mu12: f64,
    pub mu21: f64,
    pub mu03: f64,
}

impl NormalizedMoments {
    /// Collects the moments through one `normalized_moment` call each.
    ///
    /// Slower than [`MomentEngine::normalized_moments`] (one pass per
    /// moment) but yields the same values.
    pub fn from_engine<S: PixelSource>(engine: &MomentEngine<S>) -> HuResult<Self> {
        Ok(Self {
            mu20: engine.normalized_moment(2, 0)?,
            mu02: engine.normalized_moment(0, 2)?,
            mu11: engine.normalized_moment(1, 1)?,
            mu30: engine.normalized_moment(3, 0)?,
            mu12: engine.normalized_moment(1, 2)?,
            mu21: engine.normalized_moment(2, 1)?,
            mu03: engine.normalized_moment(0, 3)?,
        })
    }
}
