//! Multi-threaded generation of a level stack.
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info, warn};

use crate::batch::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::batch::output::LevelSink;
use crate::batch::pool::{default_workers, run_claimed};
use crate::batch::{
    seed_for_level, BatchReport, Level, LevelFailure, LevelOutcome, LevelPlan, LevelResult,
};
use crate::error::Result;
use crate::raster::{draw_wire, Canvas};
use crate::wire::placer::{PlacedWire, WireBounds, WirePlacer};

/// Generates one canvas per level of a [`LevelPlan`].
///
/// Each level draws from its own RNG seeded with [`seed_for_level`], so a fixed
/// base seed reproduces the same stack for any worker count.
#[derive(Debug, Clone)]
pub struct BatchGenerator {
    placer: WirePlacer,
    plan: LevelPlan,
    workers: usize,
    seed: u64,
}

impl BatchGenerator {
    pub fn try_new(bounds: WireBounds, plan: LevelPlan) -> Result<Self> {
        plan.validate()?;
        let placer = WirePlacer::try_new(bounds)?;
        Ok(Self::from_placer(placer, plan))
    }

    pub fn new(bounds: WireBounds, plan: LevelPlan) -> Self {
        debug_assert!(plan.step > 0, "n_step must be > 0");
        debug_assert!(plan.end >= plan.start, "n_end must be >= n_start");
        Self::from_placer(WirePlacer::new(bounds), plan)
    }

    /// Use a preconfigured placer, e.g. with a custom attempt budget.
    pub fn from_placer(placer: WirePlacer, plan: LevelPlan) -> Self {
        Self {
            placer,
            plan,
            workers: default_workers(),
            seed: rand::rng().next_u64(),
        }
    }

    /// Sets the number of worker threads; zero falls back to host parallelism.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = if workers == 0 {
            default_workers()
        } else {
            workers
        };
        self
    }

    /// Sets the base seed from which every level seed is derived.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn placer(&self) -> &WirePlacer {
        &self.placer
    }

    pub fn plan(&self) -> &LevelPlan {
        &self.plan
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a single level with its derived seed. Nothing is persisted.
    pub fn generate_level(&self, level: Level) -> Result<LevelResult> {
        let mut rng = StdRng::seed_from_u64(seed_for_level(self.seed, level.index));
        self.generate_level_with(level, &mut rng)
    }

    /// Generates a single level drawing from `rng`.
    pub fn generate_level_with<R: Rng + ?Sized>(
        &self,
        level: Level,
        rng: &mut R,
    ) -> Result<LevelResult> {
        self.generate_level_observed(level, rng, |_, _| {})
    }

    fn generate_level_observed<R, F>(
        &self,
        level: Level,
        rng: &mut R,
        mut on_wire: F,
    ) -> Result<LevelResult>
    where
        R: Rng + ?Sized,
        F: FnMut(usize, &PlacedWire),
    {
        let mut canvas = Canvas::new(self.placer.bounds().size);
        let mut wires = Vec::with_capacity(level.wire_count);
        let mut attempts = 0;

        for wire_index in 0..level.wire_count {
            let placed = self.placer.place(rng)?;
            draw_wire(&mut canvas, &placed.wire);
            attempts += placed.attempts;
            on_wire(wire_index, &placed);
            wires.push(placed.wire);
        }

        Ok(LevelResult {
            level,
            canvas,
            wires,
            attempts,
        })
    }

    /// Generates every level and hands each finished one to `sink`.
    pub fn run(&self, sink: &dyn LevelSink) -> BatchReport {
        self.run_with_events(sink, &mut ())
    }

    /// Like [`run`](Self::run), additionally emitting [`GenerationEvent`]s.
    ///
    /// Events are sent from worker threads, so level events interleave in
    /// completion order. The returned report is always in level order.
    pub fn run_with_events(
        &self,
        sink: &dyn LevelSink,
        events: &mut (dyn EventSink + Send),
    ) -> BatchReport {
        let level_count = self.plan.level_count();
        let workers = self.workers.clamp(1, level_count.max(1));
        let events = SharedEvents::new(events);

        info!(
            "Generating {} levels (n = {}..={} step {}) on {} workers, seed {}.",
            level_count, self.plan.start, self.plan.end, self.plan.step, workers, self.seed
        );
        if self.placer.bounds().allow_outside {
            warn!("Wires may extend past the canvas border; containment is not checked.");
            events.emit(GenerationEventKind::Warning, || GenerationEvent::Warning {
                context: "run".into(),
                message: "containment check disabled".into(),
            });
        }
        events.emit(GenerationEventKind::RunStarted, || {
            GenerationEvent::RunStarted {
                level_count,
                workers,
            }
        });

        let outcomes = run_claimed(workers, level_count, |index| {
            self.run_level(self.plan.level(index), sink, &events)
        });
        let report = BatchReport::new(outcomes);

        let failed = report.failures().count();
        let succeeded = report.len() - failed;
        if failed == 0 {
            info!("Generated all {} levels.", succeeded);
        } else {
            warn!("{} of {} levels failed.", failed, report.len());
        }
        events.emit(GenerationEventKind::RunFinished, || {
            GenerationEvent::RunFinished { succeeded, failed }
        });

        report
    }

    fn run_level(
        &self,
        level: Level,
        sink: &dyn LevelSink,
        events: &SharedEvents<'_>,
    ) -> LevelOutcome {
        info!(
            "Level {}: drawing {} wires.",
            level.index, level.wire_count
        );
        events.emit(GenerationEventKind::LevelStarted, || {
            GenerationEvent::LevelStarted {
                index: level.index,
                wire_count: level.wire_count,
            }
        });

        let mut rng = StdRng::seed_from_u64(seed_for_level(self.seed, level.index));
        let outcome = self
            .generate_level_observed(level, &mut rng, |wire_index, placed| {
                if events.wants_wires {
                    events.emit(GenerationEventKind::WirePlaced, || {
                        GenerationEvent::WirePlaced {
                            level_index: level.index,
                            wire_index,
                            attempts: placed.attempts,
                        }
                    });
                }
            })
            .and_then(|result| match sink.write_level(&result) {
                Ok(()) => Ok(result),
                Err(e) => {
                    error!("Level {}: failed to write outputs: {}", level.index, e);
                    Err(e)
                }
            });

        match outcome {
            Ok(result) => {
                info!(
                    "Level {}: finished {} wires ({} placement attempts).",
                    level.index, level.wire_count, result.attempts
                );
                events.emit(GenerationEventKind::LevelFinished, || {
                    GenerationEvent::LevelFinished {
                        index: level.index,
                        wire_count: level.wire_count,
                    }
                });
                Ok(result)
            }
            Err(error) => {
                warn!(
                    "Level {} (n = {}) failed: {}",
                    level.index, level.wire_count, error
                );
                events.emit(GenerationEventKind::LevelFailed, || {
                    GenerationEvent::LevelFailed {
                        index: level.index,
                        reason: error.to_string(),
                    }
                });
                Err(LevelFailure { level, error })
            }
        }
    }
}

/// Event sink shared by all workers.
struct SharedEvents<'a> {
    sink: Mutex<&'a mut (dyn EventSink + Send)>,
    wants_wires: bool,
}

impl<'a> SharedEvents<'a> {
    fn new(sink: &'a mut (dyn EventSink + Send)) -> Self {
        let wants_wires = sink.wants(GenerationEventKind::WirePlaced);
        Self {
            sink: Mutex::new(sink),
            wants_wires,
        }
    }

    fn emit(&self, kind: GenerationEventKind, event: impl FnOnce() -> GenerationEvent) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if sink.wants(kind) {
            sink.send(event());
        }
    }
}
