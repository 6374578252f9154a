//! Progress reporting for batch runs.
//!
//! Provides visual feedback while a batch of network-bound operations
//! drains. Purely observational; completion counting never affects
//! scheduling or results.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for one batch run.
///
/// Advances once per completed input and reaches the total exactly when
/// every input has produced a result. Hidden automatically when stderr is
/// not a terminal.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Create a progress bar for `total` inputs with a display label.
    pub fn new(total: u64, label: &str) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
                .expect("progress template is valid")
                .progress_chars("#>-"),
        );
        bar.set_message(label.to_string());
        Self { bar }
    }

    /// Record one completed input.
    pub fn advance(&self) {
        self.bar.inc(1);
    }

    /// Mark the batch as fully drained.
    pub fn finish(&self) {
        self.bar.finish();
    }

    /// Leave the bar in place on an abnormal exit path.
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
