//! Attribute sampling for wire length, width and opening angle.
//!
//! Values are drawn either uniformly from a `[min, max]` range ([`UniformRange`]) or
//! from an empirical [`DistributionTable`] via rejection sampling. [`AttributeSource`]
//! selects one of the two per attribute.
use rand::Rng;

use crate::error::Result;

pub mod table;
pub mod uniform;

pub use table::{DistributionTable, TablePoint, MAX_SAMPLING_ATTEMPTS};
pub use uniform::UniformRange;

/// Trait for drawing a scalar attribute value.
pub trait AttributeSampling: Send + Sync {
    /// Draw one value.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64>;

    /// Closed domain `(min, max)` every sample falls into.
    fn range(&self) -> (f64, f64);
}

/// Where an attribute value comes from.
#[derive(Debug, Clone)]
pub enum AttributeSource {
    Uniform(UniformRange),
    Table(DistributionTable),
}

impl AttributeSource {
    pub fn uniform(min: f64, max: f64) -> Self {
        AttributeSource::Uniform(UniformRange::new(min, max))
    }

    /// A source that always yields `value`.
    pub fn fixed(value: f64) -> Self {
        AttributeSource::Uniform(UniformRange::new(value, value))
    }
}

impl AttributeSampling for AttributeSource {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        match self {
            AttributeSource::Uniform(u) => u.sample(rng),
            AttributeSource::Table(t) => t.sample(rng),
        }
    }

    fn range(&self) -> (f64, f64) {
        match self {
            AttributeSource::Uniform(u) => u.range(),
            AttributeSource::Table(t) => t.range(),
        }
    }
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 53 random mantissa bits.
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}
