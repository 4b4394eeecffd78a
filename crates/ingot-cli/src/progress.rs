//! Progress bar implementation for CLI operations.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use ingot_core::ProgressEvent;
use ingot_core::ProgressSink;
use ingot_core::ProgressStage;
use std::fmt::Write;
use std::time::Duration;

/// CLI progress bar wrapper implementing `ProgressSink`.
///
/// Shows overall percent, the current stage, and time spent in it when
/// running in a TTY. Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    stage_elapsed: Duration,
}

impl CliProgress {
    /// Creates a new CLI progress bar.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);

        // Template: "[████████░░░░]  42% organizing: Organizing files (12/30) 3s"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos:>3}% {msg} {elapsed_human}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("elapsed_human", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.elapsed())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );

        Self {
            bar,
            stage_elapsed: Duration::ZERO,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for CliProgress {
    fn on_event(&mut self, event: &ProgressEvent) {
        self.stage_elapsed = Duration::from_millis(event.stage_elapsed_millis);
        self.bar.set_position(u64::from(event.percent));
        self.bar
            .set_message(format!("{}: {}", event.stage, event.message));

        if matches!(event.stage, ProgressStage::Completed | ProgressStage::Error) {
            self.bar.finish_and_clear();
        }
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
