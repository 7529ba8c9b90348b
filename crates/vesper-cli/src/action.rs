//! Spinner-wrapped actions
//!
//! Runs an async action behind a spinner. The spinner is cleared on
//! every exit path; a failure is shown briefly before the line is wiped.

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// How long a failed action's message stays on screen
pub const ERROR_DISPLAY: Duration = Duration::from_secs(2);

struct Spinner(ProgressBar);

impl Spinner {
    fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self(pb)
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

/// Run `action` with a pending indicator labelled `loading`.
pub async fn run<F, T>(loading: &str, action: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    run_with(Spinner::start(loading), ERROR_DISPLAY, action).await
}

async fn run_with<F, T>(spinner: Spinner, hold: Duration, action: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    let result = {
        let _spinner = spinner;
        action.await
    };

    if let Err(err) = &result {
        show_transient_error(&err.to_string(), hold).await;
    }
    result
}

async fn show_transient_error(message: &str, hold: Duration) {
    let term = Term::stderr();
    if term
        .write_line(&format!("{} {}", style("✗").red().bold(), style(message).red()))
        .is_err()
    {
        return;
    }
    tokio::time::sleep(hold).await;
    let _ = term.clear_last_lines(1);
}
