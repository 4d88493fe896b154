//! Uniform attribute sampling over a closed range.
use rand::Rng;

use crate::error::Result;
use crate::sampling::{rand01, AttributeSampling};

/// Uniform sampling `min + U(0,1) * (max - min)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

impl UniformRange {
    /// Create a new uniform range. Bounds given in reverse order are swapped.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

impl AttributeSampling for UniformRange {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        Ok(self.min + rand01(rng) * (self.max - self.min))
    }

    fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::test_rng::FixedRng;

    #[test]
    fn maps_unit_draw_linearly() {
        let range = UniformRange::new(10.0, 20.0);
        let mut rng = FixedRng::from_unit(&[0.0, 0.5, 0.25]);
        assert_eq!(range.sample(&mut rng).unwrap(), 10.0);
        assert_eq!(range.sample(&mut rng).unwrap(), 15.0);
        assert_eq!(range.sample(&mut rng).unwrap(), 12.5);
    }

    #[test]
    fn degenerate_range_is_constant() {
        let range = UniformRange::new(7.0, 7.0);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..16 {
            assert_eq!(range.sample(&mut rng).unwrap(), 7.0);
        }
    }

    #[test]
    fn swapped_bounds_are_normalized() {
        let range = UniformRange::new(5.0, 1.0);
        assert_eq!(range.range(), (1.0, 5.0));
    }

    #[test]
    fn samples_stay_in_range() {
        let range = UniformRange::new(-3.0, 4.0);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let v = range.sample(&mut rng).unwrap();
            assert!((-3.0..4.0).contains(&v));
        }
    }
}
