//! Batch generation of ordered canvas stacks.
//!
//! A [`LevelPlan`] expands `start..=end` by `step` into [`Level`]s. The
//! [`BatchGenerator`] produces one canvas per level on a pool of worker threads
//! that claim level indices from a shared counter (see [`pool::run_claimed`]),
//! persists each finished level through a [`output::LevelSink`], and returns a
//! [`BatchReport`] ordered by level regardless of completion order.
use crate::error::{Error, Result};
use crate::raster::Canvas;
use crate::wire::Wire;

pub mod events;
mod generator;
pub mod output;
pub mod pool;

pub use generator::BatchGenerator;

/// One wire-count configuration of the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Level {
    /// Position in the stack, `0..level_count`.
    pub index: usize,
    /// Number of wires drawn on this level's canvas.
    pub wire_count: usize,
}

/// Wire counts `start, start + step, ...` up to and including `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl LevelPlan {
    pub fn new(start: usize, end: usize, step: usize) -> Self {
        Self { start, end, step }
    }

    /// A plan with a single level of `wire_count` wires.
    pub fn single(wire_count: usize) -> Self {
        Self::new(wire_count, wire_count, 1)
    }

    /// Validates the plan, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(Error::InvalidConfig("n_step must be > 0".into()));
        }
        if self.end < self.start {
            return Err(Error::InvalidConfig(format!(
                "n_end ({}) must not be below n_start ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// `floor((end - start) / step) + 1`, or zero for an invalid plan.
    pub fn level_count(&self) -> usize {
        if self.step == 0 || self.end < self.start {
            return 0;
        }
        (self.end - self.start) / self.step + 1
    }

    /// The level at `index`. Does not check `index < level_count()`.
    pub fn level(&self, index: usize) -> Level {
        Level {
            index,
            wire_count: self.start + index * self.step,
        }
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        (0..self.level_count()).map(|i| self.level(i))
    }
}

/// Creates a deterministic seed for a level from a base seed.
pub fn seed_for_level(base_seed: u64, level_index: usize) -> u64 {
    let mixed = base_seed ^ (level_index as u64).wrapping_mul(0x9E3779B97F4A7C15);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// A finished level: its canvas and the wires in placement order.
#[derive(Debug, Clone)]
pub struct LevelResult {
    pub level: Level,
    pub canvas: Canvas,
    pub wires: Vec<Wire>,
    /// Placement attempts summed over all wires.
    pub attempts: usize,
}

impl LevelResult {
    /// Tab-separated wire log: header row, then one row per wire.
    pub fn wire_log(&self) -> String {
        let mut out = String::with_capacity(64 * (self.wires.len() + 1));
        out.push_str(&output::wire_log_header());
        out.push('\n');
        for wire in &self.wires {
            out.push_str(&wire.to_string());
            out.push('\n');
        }
        out
    }
}

/// Why a level did not produce a canvas.
#[derive(Debug)]
pub struct LevelFailure {
    pub level: Level,
    pub error: Error,
}

pub type LevelOutcome = std::result::Result<LevelResult, LevelFailure>;

/// Outcome of a batch run, one entry per level in level order.
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<LevelOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<LevelOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &LevelResult> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &LevelFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// `true` if every level produced a canvas.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_ok())
    }

    /// The stack in level order; failed levels are `None`.
    pub fn canvases(&self) -> Vec<Option<&Canvas>> {
        self.outcomes
            .iter()
            .map(|o| o.as_ref().ok().map(|r| &r.canvas))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;

    #[test]
    fn level_count_matches_floor_division() {
        assert_eq!(LevelPlan::new(100, 100, 10).level_count(), 1);
        assert_eq!(LevelPlan::new(10, 50, 10).level_count(), 5);
        assert_eq!(LevelPlan::new(10, 55, 10).level_count(), 5);
        assert_eq!(LevelPlan::new(0, 9, 3).level_count(), 4);
        assert_eq!(LevelPlan::new(5, 1, 1).level_count(), 0);
        assert_eq!(LevelPlan::new(1, 5, 0).level_count(), 0);
    }

    #[test]
    fn levels_ascend_by_step() {
        let counts: Vec<usize> = LevelPlan::new(10, 55, 10)
            .levels()
            .map(|l| l.wire_count)
            .collect();
        assert_eq!(counts, vec![10, 20, 30, 40, 50]);
        assert_eq!(
            LevelPlan::single(7).levels().collect::<Vec<_>>(),
            vec![Level {
                index: 0,
                wire_count: 7
            }]
        );
    }

    #[test]
    fn invalid_plans_are_rejected() {
        assert!(matches!(
            LevelPlan::new(1, 5, 0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            LevelPlan::new(6, 5, 1).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(LevelPlan::new(0, 0, 1).validate().is_ok());
    }

    #[test]
    fn level_seeds_differ_and_repeat() {
        assert_eq!(seed_for_level(42, 3), seed_for_level(42, 3));
        assert_ne!(seed_for_level(42, 3), seed_for_level(42, 4));
        assert_ne!(seed_for_level(42, 3), seed_for_level(43, 3));
    }

    #[test]
    fn wire_log_has_header_and_rows() {
        let wire = Wire::from_start(10.0, 1.0, 0.0, 0.0, IVec2::new(2, 2));
        let result = LevelResult {
            level: Level {
                index: 0,
                wire_count: 2,
            },
            canvas: Canvas::new(16),
            wires: vec![wire.clone(), wire],
            attempts: 2,
        };
        let log = result.wire_log();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], output::wire_log_header());
        assert_eq!(lines[1], lines[2]);
    }

    #[test]
    fn report_splits_outcomes_in_order() {
        let level = |index| Level {
            index,
            wire_count: index,
        };
        let report = BatchReport::new(vec![
            Ok(LevelResult {
                level: level(0),
                canvas: Canvas::new(2),
                wires: Vec::new(),
                attempts: 0,
            }),
            Err(LevelFailure {
                level: level(1),
                error: Error::Other("boom".into()),
            }),
        ]);
        assert_eq!(report.len(), 2);
        assert!(!report.is_complete());
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(report.failures().next().unwrap().level.index, 1);
        let stack = report.canvases();
        assert!(stack[0].is_some());
        assert!(stack[1].is_none());
    }

    #[test]
    fn report_without_failures_is_complete() {
        let report = BatchReport::new(vec![Ok(LevelResult {
            level: Level {
                index: 0,
                wire_count: 0,
            },
            canvas: Canvas::new(2),
            wires: Vec::new(),
            attempts: 0,
        })]);
        assert!(report.is_complete());
        assert!(BatchReport::default().is_complete());
        assert_eq!(report.failures().count(), 0);
    }
}
