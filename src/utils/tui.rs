use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);

/// Show `message` with a spinner until `work` completes. The spinner is
/// cleared before returning so the result prints on a clean line.
pub async fn with_spinner<F: Future>(message: String, work: F) -> F::Output {
    let spinner = ProgressBar::new_spinner().with_message(message);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    spinner.enable_steady_tick(TICK);

    let output = work.await;

    spinner.finish_and_clear();
    output
}
