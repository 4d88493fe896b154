//! Event types and sinks for observing batch runs.
//!
//! This module defines [`GenerationEvent`] and a set of sinks to collect or
//! forward events while a [`crate::batch::BatchGenerator`] runs. Events are
//! emitted from worker threads, so level events of different levels interleave
//! in completion order.

/// Describes events emitted during batch generation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// Emitted once before any level starts.
    RunStarted {
        /// Number of levels in the stack.
        level_count: usize,
        /// Number of worker threads.
        workers: usize,
    },

    /// Emitted when a worker claims a level.
    LevelStarted {
        /// Index of the level in the stack.
        index: usize,
        /// Number of wires to draw.
        wire_count: usize,
    },

    /// Emitted after each wire was placed and drawn.
    WirePlaced {
        /// Index of the level being generated.
        level_index: usize,
        /// Position of the wire in placement order.
        wire_index: usize,
        /// Placement attempts used for this wire.
        attempts: usize,
    },

    /// Emitted when a level was generated and persisted.
    LevelFinished {
        /// Index of the level in the stack.
        index: usize,
        /// Number of wires drawn.
        wire_count: usize,
    },

    /// Emitted when a level failed; sibling levels continue.
    LevelFailed {
        /// Index of the level in the stack.
        index: usize,
        /// Human-readable failure reason.
        reason: String,
    },

    /// Emitted once after all workers joined.
    RunFinished {
        /// Levels that produced a canvas.
        succeeded: usize,
        /// Levels that failed.
        failed: usize,
    },

    /// Non-fatal warning generated during generation.
    Warning {
        /// Context string (e.g. level index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`GenerationEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    RunStarted,
    LevelStarted,
    WirePlaced,
    LevelFinished,
    LevelFailed,
    RunFinished,
    Warning,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::RunStarted { .. } => GenerationEventKind::RunStarted,
            GenerationEvent::LevelStarted { .. } => GenerationEventKind::LevelStarted,
            GenerationEvent::WirePlaced { .. } => GenerationEventKind::WirePlaced,
            GenerationEvent::LevelFinished { .. } => GenerationEventKind::LevelFinished,
            GenerationEvent::LevelFailed { .. } => GenerationEventKind::LevelFailed,
            GenerationEvent::RunFinished { .. } => GenerationEventKind::RunFinished,
            GenerationEvent::Warning { .. } => GenerationEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally filtered by kind.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
    only: Option<Vec<GenerationEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect only events of the given kinds.
    pub fn only(kinds: &[GenerationEventKind]) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.to_vec()),
        }
    }

    pub fn into_inner(self) -> Vec<GenerationEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenerationEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }

    fn wants(&self, kind: GenerationEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks that want it.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: GenerationEvent) {
        let kind = event.kind();
        for sink in self.sinks.iter_mut().filter(|s| s.wants(kind)) {
            sink.send(event.clone());
        }
    }

    fn wants(&self, kind: GenerationEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
