//! Closed-form combination of normalized moments into the seven Hu invariants.
//!
//! The polynomials below keep the exact algebra of the report format these
//! descriptors are exchanged in, which differs from the textbook definitions
//! in three places:
//!
//! - `phi5` squares `(mu03 + mu12)` in its second bracket;
//! - `phi6` multiplies only `(mu30 + mu12)^2` by `(mu20 - mu02)` and then
//!   subtracts `(mu21 + mu03)^2` on its own;
//! - `phi7` squares its first bracket around a linear `3 * (mu21 + mu03)`.
//!
//! Downstream consumers depend on these values, so they are not normalized to
//! the textbook forms.

use std::ops::Index;

use crate::moments::NormalizedMoments;

/// Number of Hu invariants.
pub const HU_LEN: usize = 7;

/// The seven Hu invariants `I1..I7`, index-aligned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HuVector([f64; HU_LEN]);

impl HuVector {
    /// Wraps seven invariant values.
    pub fn new(values: [f64; HU_LEN]) -> Self {
        Self(values)
    }

    /// Iterates the invariants in order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Euclidean distance between two descriptor vectors.
    pub fn distance(&self, other: &HuVector) -> f64 {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl From<[f64; HU_LEN]> for HuVector {
    fn from(values: [f64; HU_LEN]) -> Self {
        Self(values)
    }
}

impl Index<usize> for HuVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Evaluates the Hu polynomials.
pub struct HuInvariantCalculator;

impl HuInvariantCalculator {
    /// Combines normalized moments into `[phi1, ..., phi7]`.
    pub fn compute(mu: &NormalizedMoments) -> HuVector {
        let NormalizedMoments {
            mu20,
            mu02,
            mu11,
            mu30,
            mu12,
            mu21,
            mu03,
        } = *mu;

        let phi1 = mu20 + mu02;
        let phi2 = (mu20 - mu02).powi(2) + (2.0 * mu11).powi(2);
        let phi3 = (mu30 - 3.0 * mu12).powi(2) + (3.0 * mu21 - mu03).powi(2);
        let phi4 = (mu30 + mu12).powi(2) + (mu21 + mu03).powi(2);
        let phi5 = (mu30 - 3.0 * mu12)
            * (mu30 + mu12)
            * ((mu30 + mu12).powi(2) - 3.0 * (mu21 + mu03).powi(2))
            + (3.0 * mu21 - mu03)
                * (mu21 + mu03)
                * (3.0 * (mu03 + mu12).powi(2) - (mu21 + mu03).powi(2));
        let phi6 = (mu20 - mu02) * (mu30 + mu12).powi(2) - (mu21 + mu03).powi(2)
            + 4.0 * mu11 * (mu30 + mu12) * (mu21 + mu03);
        let phi7 = (3.0 * mu21 - mu03)
            * (mu30 + mu12)
            * ((mu30 + mu12).powi(2) - 3.0 * (mu21 + mu03)).powi(2)
            + (mu30 - 3.0 * mu12)
                * (mu21 + mu03)
                * (3.0 * (mu30 + mu12).powi(2) - (mu21 + mu03).powi(2));

        HuVector([phi1, phi2, phi3, phi4, phi5, phi6, phi7])
    }
}

#[cfg(test)]
mod tests {
    use super::{HuInvariantCalculator, HuVector};
    use crate::moments::NormalizedMoments;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn second_order_only() {
        let mu = NormalizedMoments {
            mu20: 0.3,
            mu02: 0.1,
            mu11: 0.05,
            ..NormalizedMoments::default()
        };
        let hu = HuInvariantCalculator::compute(&mu);
        assert!(close(hu[0], 0.4));
        assert!(close(hu[1], 0.04 + 0.01));
        for i in 2..7 {
            assert_eq!(hu[i], 0.0);
        }
    }

    #[test]
    fn third_order_polynomials_follow_exchange_form() {
        let mu = NormalizedMoments {
            mu20: 0.2,
            mu02: 0.1,
            mu11: 0.01,
            mu30: 0.03,
            mu12: 0.01,
            mu21: 0.02,
            mu03: 0.04,
        };
        let hu = HuInvariantCalculator::compute(&mu);
        // a = mu30 + mu12 = 0.04, b = mu21 + mu03 = 0.06
        // c1 = mu30 - 3 mu12 = 0.0, c2 = 3 mu21 - mu03 = 0.02
        assert!(close(hu[2], 0.0004));
        assert!(close(hu[3], 0.0016 + 0.0036));
        // c2 * b * (3 * (mu03 + mu12)^2 - b^2) = 0.02 * 0.06 * (0.0075 - 0.0036)
        assert!(close(hu[4], 0.02 * 0.06 * 0.0039));
        // (0.1) * 0.0016 - 0.0036 + 4 * 0.01 * 0.04 * 0.06
        assert!(close(hu[5], 0.00016 - 0.0036 + 0.000096));
        // c2 * a * (a^2 - 3b)^2 = 0.02 * 0.04 * (0.0016 - 0.18)^2
        assert!(close(hu[6], 0.02 * 0.04 * (0.0016f64 - 0.18).powi(2)));
    }

    #[test]
    fn phi6_subtracts_second_square_unscaled() {
        // Normalized moments of the 3x2 L mask (0,0) (1,0) (2,0) (0,1).
        let mu = NormalizedMoments {
            mu20: 0.171875,
            mu02: 0.046875,
            mu11: -0.046875,
            mu30: 0.03515625,
            mu12: -0.01171875,
            mu21: -0.00390625,
            mu03: 0.01171875,
        };
        let hu = HuInvariantCalculator::compute(&mu);
        // a = 0.0234375, b = 0.0078125
        // 0.125 * a^2 - b^2 + 4 * mu11 * a * b
        let a: f64 = 0.0234375;
        let b: f64 = 0.0078125;
        let expected = 0.125 * a * a - b * b + 4.0 * -0.046875 * a * b;
        assert!(close(hu[5], expected));
        assert!(close(hu[5], -2.6702880859375e-5));
        assert!(hu[5] < 0.0);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = HuVector::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = HuVector::new([4.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(close(a.distance(&b), 5.0));
        assert_eq!(a.distance(&a), 0.0);
    }
}
