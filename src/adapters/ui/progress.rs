//! Spinner shown while the record store is being read.

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);

/// Spinner with a cyan frame and `message`.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(TICK);
    pb
}

/// Awaits `fut` behind a spinner, clearing it once the future settles.
pub async fn with_spinner<F, T>(message: impl Into<String>, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = spinner(message);
    let out = fut.await;
    pb.finish_and_clear();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_spinner_returns_future_output() {
        let value = with_spinner("loading", async { 42 }).await;
        assert_eq!(value, 42);
    }
}
