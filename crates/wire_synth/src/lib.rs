#![forbid(unsafe_code)]
//! wire_synth: Procedural wire-network synthesis for percolation studies.
//!
//! Modules:
//! - sampling: attribute draws from uniform ranges or empirical distribution tables
//! - wire: wire geometry, bounded placement on a square canvas, log rows
//! - raster: 8-bit canvas and stroke rasterization of straight and bent wires
//! - batch: level plans, work-claiming worker pool, batch generator, events, persistence
//! - config: TOML parameter file mirroring the classic plugin keys
//! - stage: interface for downstream stages that consume a generated stack
pub mod batch;
pub mod config;
pub mod error;
pub mod raster;
pub mod sampling;
pub mod stage;
pub mod wire;

/// Convenient re-exports for common types. Import with `use wire_synth::prelude::*;`.
pub mod prelude {
    pub use crate::batch::events::{
        EventSink, FnSink, GenerationEvent, GenerationEventKind, MultiSink, VecSink,
    };
    pub use crate::batch::output::{
        wire_log_header, DirectorySink, FileNaming, LevelSink, NullSink,
    };
    pub use crate::batch::pool::{default_workers, run_claimed};
    pub use crate::batch::{
        seed_for_level, BatchGenerator, BatchReport, Level, LevelFailure, LevelOutcome,
        LevelPlan, LevelResult,
    };
    pub use crate::config::{WireConfig, WireParameters};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{draw_wire, Canvas, FOREGROUND};
    pub use crate::sampling::{
        AttributeSampling, AttributeSource, DistributionTable, UniformRange,
    };
    pub use crate::stage::{run_stage, StackStage, StageOutcome};
    pub use crate::wire::placer::{PlacedWire, WireAttributes, WireBounds, WirePlacer};
    pub use crate::wire::Wire;
}
