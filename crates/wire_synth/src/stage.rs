//! Interface for stages that consume a generated stack.
//!
//! A stage maps every canvas of an ordered stack to a new canvas, one level at
//! a time, on the same work-claiming pool the generator uses. Stages run one
//! after another; each call to [`run_stage`] joins before returning.
use tracing::{info, warn};

use crate::batch::pool::run_claimed;
use crate::batch::Level;
use crate::error::Result;
use crate::raster::Canvas;

/// A per-level transformation of canvases, e.g. skeletonization.
pub trait StackStage: Sync {
    fn name(&self) -> &str;

    fn process(&self, level: Level, canvas: &Canvas) -> Result<Canvas>;
}

/// Result of one stage for one level.
pub type StageOutcome = (Level, Result<Canvas>);

/// Applies `stage` to every level of `stack`, returning outcomes in stack order.
pub fn run_stage<S>(stage: &S, stack: &[(Level, &Canvas)], workers: usize) -> Vec<StageOutcome>
where
    S: StackStage + ?Sized,
{
    info!(
        "Running stage '{}' on {} levels.",
        stage.name(),
        stack.len()
    );
    run_claimed(workers, stack.len(), |i| {
        let (level, canvas) = stack[i];
        let result = stage.process(level, canvas);
        if let Err(e) = &result {
            warn!(
                "Stage '{}' failed on level {}: {}",
                stage.name(),
                level.index,
                e
            );
        }
        (level, result)
    })
}
