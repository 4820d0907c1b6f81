use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} {msg}";
const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Numbered steps on stderr: a spinner while a step runs, then a mark, the
/// elapsed time and optional detail lines. Does nothing when not interactive.
pub struct Progress {
    live: Option<Live>,
}

struct Live {
    spinner: Option<(ProgressBar, Instant)>,
    started: Instant,
    done: u8,
    total: u8,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        let live = interactive.then(|| Live {
            spinner: None,
            started: Instant::now(),
            done: 0,
            total: total_steps,
        });
        Self { live }
    }

    pub fn step(&mut self, description: &str) {
        let Some(live) = &mut self.live else {
            return;
        };

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
            bar.set_style(style.tick_chars(TICK_CHARS));
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!("[{}/{}] {description}...", live.done + 1, live.total));
        live.spinner = Some((bar, Instant::now()));
    }

    pub fn complete_step(&mut self, description: &str, details: &[String]) {
        self.end_step("\x1b[32m✓\x1b[0m", description, details);
    }

    /// Ends the current step with a warning mark instead of a check.
    pub fn warn_step(&mut self, description: &str, details: &[String]) {
        self.end_step("\x1b[33m!\x1b[0m", description, details);
    }

    fn end_step(&mut self, mark: &str, description: &str, details: &[String]) {
        let Some(live) = &mut self.live else {
            return;
        };

        let elapsed = match live.spinner.take() {
            Some((bar, since)) => {
                bar.finish_and_clear();
                since.elapsed()
            }
            None => Duration::ZERO,
        };
        live.done += 1;

        let mut err = io::stderr().lock();
        let _ = writeln!(
            err,
            "  {mark} {description:<44} {:>5.1}s",
            elapsed.as_secs_f64()
        );
        for line in details {
            let _ = writeln!(err, "      \x1b[2m·\x1b[0m {line}");
        }
    }

    pub fn finish(self) {
        let Some(live) = self.live else {
            return;
        };
        if let Some((bar, _)) = live.spinner {
            bar.finish_and_clear();
        }

        let total = format!("{:.2}s", live.started.elapsed().as_secs_f64());
        let _ = writeln!(io::stderr().lock(), "\n  \x1b[32m✓\x1b[0m Done in {total}\n");
    }
}
