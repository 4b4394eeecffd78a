//! Staged progress reporting for the ingestion pipeline.
//!
//! # Components
//!
//! - **`ProgressSink`**: receives events, implemented by front-ends
//! - **`ProgressReporter`**: enforces stage ordering and stamps timings
//!   before forwarding events to a sink

use std::fmt;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

/// Pipeline stage.
///
/// Stages are ordered. `Completed` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    /// Pipeline set-up.
    Initializing,
    /// Upload and structure validation.
    Validating,
    /// Decoding into the scratch area.
    Extracting,
    /// Relocating entries into the export layout.
    Organizing,
    /// Scratch clean-up.
    Finalizing,
    /// Pipeline finished successfully.
    Completed,
    /// Pipeline failed.
    Error,
}

impl ProgressStage {
    /// Returns `true` for `Completed` and `Error`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Lowercase stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Validating => "validating",
            Self::Extracting => "extracting",
            Self::Organizing => "organizing",
            Self::Finalizing => "finalizing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Stage the pipeline is in.
    pub stage: ProgressStage,
    /// Overall completion, 0 to 100.
    pub percent: u8,
    /// Human-readable description.
    pub message: String,
    /// Wall-clock time of the event in milliseconds since the Unix epoch.
    pub timestamp_millis: u64,
    /// Milliseconds since the pipeline started.
    pub elapsed_millis: u64,
    /// Milliseconds since the current stage started.
    pub stage_elapsed_millis: u64,
}

/// Receiver of progress events.
///
/// Sinks are invoked synchronously on the pipeline thread, so slow sinks
/// slow the pipeline down.
///
/// # Examples
///
/// ```
/// use ingot_core::ProgressEvent;
/// use ingot_core::ProgressSink;
///
/// struct PrintProgress;
///
/// impl ProgressSink for PrintProgress {
///     fn on_event(&mut self, event: &ProgressEvent) {
///         println!("[{:>3}%] {}: {}", event.percent, event.stage, event.message);
///     }
/// }
/// ```
pub trait ProgressSink: Send {
    /// Called once per accepted event, in stage order.
    fn on_event(&mut self, event: &ProgressEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_event(&mut self, _event: &ProgressEvent) {}
}

/// Sink that records every event.
#[derive(Debug, Default, Clone)]
pub struct CollectingProgress {
    /// Events in delivery order.
    pub events: Vec<ProgressEvent>,
}

impl CollectingProgress {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages of the recorded events, in order.
    #[must_use]
    pub fn stages(&self) -> Vec<ProgressStage> {
        self.events.iter().map(|e| e.stage).collect()
    }

    /// The last recorded event.
    #[must_use]
    pub fn last(&self) -> Option<&ProgressEvent> {
        self.events.last()
    }
}

impl ProgressSink for CollectingProgress {
    fn on_event(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to a sink while keeping stages monotonic.
pub struct ProgressReporter<'a> {
    sink: &'a mut dyn ProgressSink,
    stage: ProgressStage,
    started: Instant,
    stage_started: Instant,
}

impl<'a> ProgressReporter<'a> {
    /// Starts timing a pipeline reporting to `sink`.
    pub fn new(sink: &'a mut dyn ProgressSink) -> Self {
        let now = Instant::now();
        Self {
            sink,
            stage: ProgressStage::Initializing,
            started: now,
            stage_started: now,
        }
    }

    /// Reports progress. `percent` is clamped to 100.
    ///
    /// Returns `false` if the event was dropped, either because `stage`
    /// precedes the current stage or because a terminal stage was already
    /// reached. `Error` is accepted from any non-terminal stage.
    pub fn report(&mut self, stage: ProgressStage, percent: u32, message: impl Into<String>) -> bool {
        let message = message.into();

        if self.stage.is_terminal() {
            log::debug!("dropping {stage} event after terminal stage {}: {message}", self.stage);
            return false;
        }
        if stage < self.stage {
            log::debug!("dropping {stage} event after {}: {message}", self.stage);
            return false;
        }

        let now = Instant::now();
        if stage != self.stage {
            log::debug!("stage {} -> {stage}", self.stage);
            self.stage = stage;
            self.stage_started = now;
        }

        let event = ProgressEvent {
            stage,
            percent: u8::try_from(percent.min(100)).unwrap_or(100),
            message,
            timestamp_millis: unix_millis(),
            elapsed_millis: millis(now.duration_since(self.started)),
            stage_elapsed_millis: millis(now.duration_since(self.stage_started)),
        };
        self.sink.on_event(&event);
        true
    }

    /// Reports a terminal `Error` event.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        self.report(ProgressStage::Error, 100, message)
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> ProgressStage {
        self.stage
    }

    /// Time since the reporter was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, millis)
}
