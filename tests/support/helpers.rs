use std::time::Duration;

use anyhow::{bail, Result};
use mkxray::{
    Console, JobOutput, JobStatus, MemorySurface, Palette, Runner, SurfaceOp, Task, TaskFuture,
};
use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

pub const HEADER: &str = "Setup mkxray, please wait...";

static TRACING_SUBSCRIBER: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn init_tracing() {
    Lazy::force(&TRACING_SUBSCRIBER);
}

/// Context shared by test jobs: the order in which tasks ran.
#[derive(Debug, Default)]
pub struct CallLog {
    pub calls: Vec<String>,
}

/// Records its name, optionally writes output, then succeeds or fails.
pub struct RecordingTask {
    name: String,
    writes: Vec<String>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl RecordingTask {
    pub fn ok(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            writes: Vec::new(),
            failure: None,
            delay: None,
        }
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::ok(name)
        }
    }

    pub fn writing(mut self, text: &str) -> Self {
        self.writes.push(text.to_owned());
        self
    }

    pub fn sleeping(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Task<CallLog> for RecordingTask {
    fn execute<'a>(
        &'a self,
        ctx: &'a mut CallLog,
        output: &'a mut dyn JobOutput,
    ) -> TaskFuture<'a> {
        Box::pin(async move {
            ctx.calls.push(self.name.clone());
            for text in &self.writes {
                output.write(text)?;
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = &self.failure {
                bail!("{message}");
            }
            Ok(())
        })
    }
}

pub fn plain_runner(tasks: Vec<RecordingTask>) -> Runner<CallLog, MemorySurface> {
    let jobs = tasks
        .into_iter()
        .map(|task| {
            let name = task.name.clone();
            mkxray::Job::new(name, task)
        })
        .collect();
    let console = Console::with_palette(HEADER, jobs, MemorySurface::new(), Palette::new(false));
    Runner::new(console, CallLog::default())
}

pub fn statuses(runner: &Runner<CallLog, MemorySurface>) -> Vec<JobStatus> {
    runner
        .console()
        .jobs()
        .iter()
        .map(|job| job.status())
        .collect()
}

/// Asserts every erase removed exactly the rows of the write before it.
pub fn assert_erase_matches_previous_frame(ops: &[SurfaceOp]) -> Result<()> {
    let mut previous = 0;
    for (step, op) in ops.iter().enumerate() {
        match op {
            SurfaceOp::Clear(rows) => {
                if *rows != previous {
                    bail!("step {step}: erased {rows} rows but {previous} were drawn");
                }
                previous = 0;
            }
            SurfaceOp::Write(lines) => previous += lines.len(),
        }
    }
    Ok(())
}

/// Every frame written, in order.
pub fn frames(ops: &[SurfaceOp]) -> Vec<Vec<String>> {
    ops.iter()
        .filter_map(|op| match op {
            SurfaceOp::Write(lines) => Some(lines.clone()),
            SurfaceOp::Clear(_) => None,
        })
        .collect()
}
