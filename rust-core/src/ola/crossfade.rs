//! Crossfade curves for splicing overlapping blocks
//!
//! A curve maps a position `x` in `[0, 1]` to a fade-in gain. The fade-out
//! of the previous block uses the same table read backwards.

use std::f64::consts::FRAC_PI_2;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul};

/// Floating-point sample type the splice engine can blend
pub trait Sample: Copy + Default + Debug + Add<Output = Self> + Mul<Output = Self> + AddAssign {
    fn from_f64(value: f64) -> Self;
}

impl Sample for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Crossfade gain laws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossfadeCurve {
    /// Polynomial approximation of an equal-power fade:
    /// g(x) = (x(1-x)(1 + k·x(1-x)) + x)², k = 1.4186
    /// Power sum g(x)² + g(1-x)² stays within about 1% of unity.
    #[default]
    EnergyPreserving,

    /// Exact equal-power fade: g(x) = sin(πx/2)
    EqualPowerSine,

    /// Equal-gain fade: g(x) = x (amplitude sum is 1, power dips to 0.5)
    Linear,
}

impl CrossfadeCurve {
    /// Fade-in gain at position `x`, clamped to `[0, 1]`
    pub fn gain(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        match self {
            CrossfadeCurve::EnergyPreserving => {
                const K: f64 = 1.4186;
                let v = x * (1.0 - x);
                let term = v * (1.0 + K * v) + x;
                // The polynomial overshoots unity slightly above x ≈ 0.84.
                (term * term).min(1.0)
            }
            CrossfadeCurve::EqualPowerSine => (FRAC_PI_2 * x).sin(),
            CrossfadeCurve::Linear => x,
        }
    }

    /// True for curves whose power sum stays close to unity
    pub fn is_energy_preserving(&self) -> bool {
        !matches!(self, CrossfadeCurve::Linear)
    }
}

/// Generate a fade-in table of `length` gains
///
/// Entry `i` is the gain at `x = i / length`, so the table starts at silence
/// and stops one step short of unity.
pub fn generate_crossfade<T: Sample>(curve: CrossfadeCurve, length: usize) -> Vec<T> {
    let n = length as f64;
    (0..length)
        .map(|i| T::from_f64(curve.gain(i as f64 / n)))
        .collect()
}
