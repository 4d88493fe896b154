use std::time::Duration;

use criterion::{Criterion, Throughput};

// Batch runs rasterize whole canvases; keep the sample count low.
pub const SAMPLE_SIZE: usize = 10;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput in drawn values, wires or levels; never zero.
pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}
