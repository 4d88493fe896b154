//! Empirical distribution tables and rejection sampling.
//!
//! A table is a list of `(value, weight)` points sorted by value. Weights are
//! normalized to sum to one when the table is built. Sampling draws a candidate
//! uniformly over `[min, max]` and accepts it with the probability given by the
//! piecewise-linear interpolation of the weights at the candidate, so the
//! accepted values follow a density proportional to that interpolation.
//!
//! The on-disk format has one `value,weight` row per line and no header:
//!
//! ```text
//! 5,0.3
//! 10,0.3
//! 20,0.4
//! ```
use std::fs;
use std::path::Path;

use rand::Rng;

use crate::error::{Error, Result};
use crate::sampling::{rand01, AttributeSampling};

/// Minimum rejection-sampling budget for a single value.
///
/// Tables scale the budget by the inverse of their peak normalized weight, since
/// the acceptance rate of a flat table shrinks with its row count.
pub const MAX_SAMPLING_ATTEMPTS: usize = 100_000;

/// One `(value, weight)` point of a [`DistributionTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TablePoint {
    pub value: f64,
    /// Normalized weight.
    pub weight: f64,
}

/// Weighted empirical distribution, sorted ascending by value.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionTable {
    points: Vec<TablePoint>,
    max_attempts: usize,
}

impl DistributionTable {
    /// Build a table from raw `(value, weight)` pairs.
    ///
    /// Pairs are sorted by value and weights normalized to sum to one.
    pub fn from_pairs(pairs: &[(f64, f64)], source_name: &str) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::table(source_name, "table has no rows"));
        }
        for (i, &(value, weight)) in pairs.iter().enumerate() {
            if !value.is_finite() || !weight.is_finite() {
                return Err(Error::table(
                    source_name,
                    format!("row {} is not finite", i + 1),
                ));
            }
            if weight < 0.0 {
                return Err(Error::table(
                    source_name,
                    format!("row {} has negative weight {weight}", i + 1),
                ));
            }
        }

        let total: f64 = pairs.iter().map(|&(_, w)| w).sum();
        if total <= 0.0 {
            return Err(Error::table(source_name, "weights sum to zero"));
        }

        let mut points: Vec<TablePoint> = pairs
            .iter()
            .map(|&(value, weight)| TablePoint {
                value,
                weight: weight / total,
            })
            .collect();
        points.sort_by(|a, b| a.value.total_cmp(&b.value));

        let peak = points.iter().map(|p| p.weight).fold(0.0, f64::max);
        let max_attempts =
            MAX_SAMPLING_ATTEMPTS.max((MAX_SAMPLING_ATTEMPTS as f64 / peak) as usize);

        Ok(Self {
            points,
            max_attempts,
        })
    }

    /// Parse the comma-separated text format.
    pub fn parse(text: &str, source_name: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(',').map(str::trim);
            let (Some(value), Some(weight), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::table(
                    source_name,
                    format!("line {}: expected 'value,weight', got '{line}'", line_no + 1),
                ));
            };
            let parse = |field: &str| {
                field.parse::<f64>().map_err(|e| {
                    Error::table(
                        source_name,
                        format!("line {}: '{field}' is not a number ({e})", line_no + 1),
                    )
                })
            };
            pairs.push((parse(value)?, parse(weight)?));
        }
        Self::from_pairs(&pairs, source_name)
    }

    /// Read and parse a table file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::table(path.display().to_string(), format!("cannot read file: {e}"))
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Rejection-sampling attempts allowed per drawn value.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Override the rejection-sampling attempt cap.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn points(&self) -> &[TablePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.points[0].value
    }

    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1].value
    }

    /// Interpolated normalized weight at `x`.
    ///
    /// The bracket is the first point whose value exceeds `x`, clamped so that
    /// `x <= min` falls into the first interval and `x >= max` into the last one.
    pub fn weight_at(&self, x: f64) -> f64 {
        let n = self.points.len();
        if n == 1 {
            return self.points[0].weight;
        }
        let upper = self.points.partition_point(|p| p.value <= x).clamp(1, n - 1);
        let lo = self.points[upper - 1];
        let hi = self.points[upper];
        let span = hi.value - lo.value;
        if span <= 0.0 {
            return lo.weight.max(hi.weight);
        }
        lo.weight + (x - lo.value) * (hi.weight - lo.weight) / span
    }
}

impl AttributeSampling for DistributionTable {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        let (min, max) = self.range();
        if self.points.len() == 1 || max <= min {
            return Ok(min);
        }

        for _ in 0..self.max_attempts {
            let candidate = min + rand01(rng) * (max - min);
            let acceptance = self.weight_at(candidate);
            if rand01(rng) < acceptance {
                return Ok(candidate);
            }
        }

        Err(Error::SamplingExhausted {
            attempts: self.max_attempts,
        })
    }

    fn range(&self) -> (f64, f64) {
        (self.min(), self.max())
    }
}
