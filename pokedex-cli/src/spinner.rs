//! Single-line spinner shown while a catalog request is in flight.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Ticking spinner that clears its line when dropped.
pub(crate) struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Start ticking with `msg`. When `quiet` is true nothing is drawn.
    pub(crate) fn start(msg: impl Into<String>, quiet: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|");
        pb.set_style(style);
        pb.set_message(msg.into());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
    }
}
