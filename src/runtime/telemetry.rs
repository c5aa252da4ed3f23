use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs a tracing subscriber (if one is not already active).
///
/// Standard output belongs to the checklist, so events never go there. With a
/// log file the subscriber writes to it and falls back to `info`; without one it
/// writes to stderr and stays silent unless `RUST_LOG` asks otherwise.
/// Calling this function multiple times is harmless.
pub fn init_tracing(log_file: Option<&Path>) -> io::Result<()> {
    if TRACING_INIT.get().is_some() {
        return Ok(());
    }

    match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(io::stderr)
                .try_init();
        }
    }

    let _ = TRACING_INIT.set(());
    Ok(())
}

/// Counters gathered while the job list runs.
#[derive(Default, Debug)]
pub struct Telemetry {
    jobs_ok: usize,
    jobs_failed: usize,
    durations: Vec<(String, Duration)>,
}

impl Telemetry {
    pub fn record_ok(&mut self, job: &str, elapsed: Duration) {
        self.jobs_ok += 1;
        self.durations.push((job.to_owned(), elapsed));
    }

    pub fn record_failure(&mut self, job: &str, elapsed: Duration) {
        self.jobs_failed += 1;
        self.durations.push((job.to_owned(), elapsed));
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            jobs_ok: self.jobs_ok,
            jobs_failed: self.jobs_failed,
            total_elapsed: self.durations.iter().map(|(_, elapsed)| *elapsed).sum(),
        }
    }

    /// Per-job wall time, in execution order.
    pub fn durations(&self) -> &[(String, Duration)] {
        &self.durations
    }

    /// Logs one summary event for the run.
    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        tracing::info!(
            target: "mkxray::telemetry",
            jobs_ok = snapshot.jobs_ok,
            jobs_failed = snapshot.jobs_failed,
            elapsed_ms = snapshot.total_elapsed.as_millis() as u64,
            "job list finished"
        );
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub jobs_ok: usize,
    pub jobs_failed: usize,
    pub total_elapsed: Duration,
}
