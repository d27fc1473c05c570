use foldbatch::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;
const PHASE_DONE: &str = "✓ Done";

/// Renders batch progress on stderr: a spinner while inputs are discovered, a bar with
/// the current job name while predictions run.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    #[cfg(test)]
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        pb.finish_and_clear();
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = Arc::clone(&self.pb);
        Box::new(move |progress: Progress| match pb.lock() {
            Ok(bar) => render(&bar, progress),
            Err(_) => warn!("Progress bar mutex was poisoned. Cannot update progress."),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn render(bar: &ProgressBar, progress: Progress) {
    match progress {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(spinner_style());
            bar.set_message(name);
            bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message(PHASE_DONE);
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.reset();
            bar.set_length(total_steps);
            bar.set_style(job_bar_style());
        }
        Progress::StatusUpdate { text } => bar.set_message(text),
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            if let Some(total) = bar.length() {
                bar.set_position(total);
            }
            bar.finish();
        }
        // `println` is a no-op on hidden targets; job errors must still reach the user.
        Progress::Message(text) => bar.suspend(|| eprintln!("  {}", text)),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn job_bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<30} [{bar:40.cyan/blue}] {pos}/{len} jobs ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key(
            "eta",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.0}s", state.eta().as_secs_f64());
            },
        )
        .progress_chars("##-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldbatch::engine::progress::ProgressReporter;

    fn bar_state(handler: &CliProgressHandler) -> (Option<u64>, u64, String, bool) {
        let pb = handler.pb.lock().unwrap();
        (pb.length(), pb.position(), pb.message(), pb.is_finished())
    }

    #[test]
    fn handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::hidden();
        let (length, position, _, finished) = bar_state(&handler);
        assert_eq!(length, Some(0));
        assert_eq!(position, 0);
        assert!(finished);
    }

    #[test]
    fn discovery_phase_shows_spinner_then_done() {
        let handler = CliProgressHandler::hidden();
        let reporter = ProgressReporter::with_callback(handler.get_callback());

        reporter.report(Progress::PhaseStart {
            name: "Discovering inputs",
        });
        let (_, _, message, finished) = bar_state(&handler);
        assert_eq!(message, "Discovering inputs");
        assert!(!finished);

        reporter.report(Progress::PhaseFinish);
        let (_, _, message, finished) = bar_state(&handler);
        assert_eq!(message, PHASE_DONE);
        assert!(finished);
    }

    #[test]
    fn batch_run_tracks_jobs_and_current_job_name() {
        let handler = CliProgressHandler::hidden();
        let reporter = ProgressReporter::with_callback(handler.get_callback());

        reporter.report(Progress::PhaseStart {
            name: "Running predictions",
        });
        reporter.report(Progress::TaskStart { total_steps: 3 });
        reporter.report(Progress::StatusUpdate {
            text: "Processing: WT_LIG1".to_string(),
        });
        reporter.report(Progress::TaskIncrement);
        reporter.report(Progress::StatusUpdate {
            text: "Processing: WT_A2G_LIG1".to_string(),
        });
        reporter.report(Progress::Message(
            "!!! Error in WT_A2G_LIG1: engine exited with status 1".to_string(),
        ));
        reporter.report(Progress::TaskIncrement);

        let (length, position, message, finished) = bar_state(&handler);
        assert_eq!(length, Some(3));
        assert_eq!(position, 2);
        assert_eq!(message, "Processing: WT_A2G_LIG1");
        assert!(!finished);

        reporter.report(Progress::TaskFinish);
        let (_, position, _, finished) = bar_state(&handler);
        assert_eq!(position, 3);
        assert!(finished);
    }

    #[test]
    fn new_phase_after_batch_resets_the_bar() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();
        callback(Progress::TaskStart { total_steps: 4 });
        callback(Progress::TaskIncrement);
        callback(Progress::PhaseStart {
            name: "Benchmarking engine",
        });

        let (length, position, message, _) = bar_state(&handler);
        assert_eq!(length, Some(0));
        assert_eq!(position, 0);
        assert_eq!(message, "Benchmarking engine");
    }
}
