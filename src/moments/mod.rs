//! Raw, central and scale-normalized image moments of a binary mask.
//!
//! The three stages build on each other: the centroid comes from raw
//! moments, central moments are taken about that centroid, and normalized
//! moments divide by a power of the foreground area. A `MomentEngine` holds
//! the per-image scratch state (area and centroid) and is dropped together
//! with the image it was created for.

use std::cell::OnceCell;

use crate::hu::{HuInvariantCalculator, HuVector};
use crate::image::PixelSource;
use crate::trace::{trace_event, trace_span};
use crate::util::{HuError, HuResult};

mod normalized;

pub use normalized::NormalizedMoments;

/// Area-weighted center of the foreground, in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

/// Moment computations for a single pixel source.
///
/// `M(0,0)` and the centroid are computed on first use and cached, so every
/// central moment of one image is taken about the identical centroid value.
#[derive(Debug)]
pub struct MomentEngine<S> {
    source: S,
    area: OnceCell<f64>,
    centroid: OnceCell<Centroid>,
}

impl<S: PixelSource> MomentEngine<S> {
    /// Wraps a pixel source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            area: OnceCell::new(),
            centroid: OnceCell::new(),
        }
    }

    /// Returns the wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Computes `M(p,q) = sum x^p * y^q * mask(x,y)` over the full extent.
    pub fn raw_moment(&self, p: u32, q: u32) -> f64 {
        self.accumulate(|x, y| x.powi(p as i32) * y.powi(q as i32))
    }

    /// Returns the foreground pixel count `M(0,0)`.
    pub fn area(&self) -> f64 {
        *self.area.get_or_init(|| self.raw_moment(0, 0))
    }

    /// Returns `(M(1,0)/M(0,0), M(0,1)/M(0,0))`.
    ///
    /// Fails with [`HuError::DegenerateImage`] when the mask is empty.
    pub fn centroid(&self) -> HuResult<Centroid> {
        if let Some(centroid) = self.centroid.get() {
            return Ok(*centroid);
        }
        let m00 = self.area();
        if m00 <= 0.0 {
            return Err(HuError::DegenerateImage);
        }
        let centroid = Centroid {
            x: self.raw_moment(1, 0) / m00,
            y: self.raw_moment(0, 1) / m00,
        };
        trace_event!("moments_centroid", area = m00, xg = centroid.x, yg = centroid.y);
        Ok(*self.centroid.get_or_init(|| centroid))
    }

    /// Computes `N(p,q) = sum (x-xg)^p * (y-yg)^q * mask(x,y)`.
    pub fn central_moment(&self, p: u32, q: u32) -> HuResult<f64> {
        let c = self.centroid()?;
        Ok(self.accumulate(|x, y| central_term(x - c.x, y - c.y, p, q)))
    }

    /// Computes `mu(p,q) = N(p,q) / N(0,0)^((p+q)/2 + 1)`.
    pub fn normalized_moment(&self, p: u32, q: u32) -> HuResult<f64> {
        let n00 = self.central_moment(0, 0)?;
        let npq = self.central_moment(p, q)?;
        Ok(npq / n00.powf(gamma(p, q)))
    }

    /// Computes every normalized moment the Hu invariants need.
    ///
    /// Central moments are accumulated in a single pass over the mask. Each
    /// term is evaluated exactly as in [`Self::central_moment`] and summed in
    /// the same order, so the results are bit-identical to seven separate
    /// `normalized_moment` calls.
    pub fn normalized_moments(&self) -> HuResult<NormalizedMoments> {
        let c = self.centroid()?;
        let mut n = [0.0f64; 8];
        self.for_each_foreground(|x, y| {
            let dx = x - c.x;
            let dy = y - c.y;
            for (acc, &(p, q)) in n.iter_mut().zip(ORDERS.iter()) {
                *acc += central_term(dx, dy, p, q);
            }
        });
        let n00 = n[0];
        let mu = |i: usize| {
            let (p, q) = ORDERS[i];
            n[i] / n00.powf(gamma(p, q))
        };
        Ok(NormalizedMoments {
            mu20: mu(1),
            mu02: mu(2),
            mu11: mu(3),
            mu30: mu(4),
            mu12: mu(5),
            mu21: mu(6),
            mu03: mu(7),
        })
    }

    /// Runs the full pipeline and returns the seven Hu invariants.
    pub fn hu_invariants(&self) -> HuResult<HuVector> {
        let mu = self.normalized_moments()?;
        Ok(HuInvariantCalculator::compute(&mu))
    }

    fn accumulate<F>(&self, term: F) -> f64
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut sum = 0.0f64;
        self.for_each_foreground(|x, y| sum += term(x, y));
        sum
    }

    // Row-major walk over foreground pixels; background contributes zero.
    fn for_each_foreground<F>(&self, mut visit: F)
    where
        F: FnMut(f64, f64),
    {
        let width = self.source.width();
        let height = self.source.height();
        for y in 0..height {
            for x in 0..width {
                if self.source.get(x, y) != 0 {
                    visit(x as f64, y as f64);
                }
            }
        }
    }
}

/// Central-moment orders accumulated by `normalized_moments`, `N(0,0)` first.
const ORDERS: [(u32, u32); 8] = [
    (0, 0),
    (2, 0),
    (0, 2),
    (1, 1),
    (3, 0),
    (1, 2),
    (2, 1),
    (0, 3),
];

#[inline]
fn central_term(dx: f64, dy: f64, p: u32, q: u32) -> f64 {
    dx.powi(p as i32) * dy.powi(q as i32)
}

#[inline]
fn gamma(p: u32, q: u32) -> f64 {
    f64::from(p + q) / 2.0 + 1.0
}

/// Computes the Hu invariants of one pixel source.
pub fn hu_moments<S: PixelSource>(source: S) -> HuResult<HuVector> {
    let _span = trace_span!(
        "hu_image",
        width = source.width(),
        height = source.height()
    )
    .entered();
    MomentEngine::new(source).hu_invariants()
}
