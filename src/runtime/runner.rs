use crate::runtime::console::Console;
use crate::runtime::hooks::TaskDecision;
use crate::runtime::job::JobStatus;
use crate::runtime::progress::JobCursor;
use crate::runtime::surface::Surface;
use crate::runtime::task::{JobError, JobOutput, JobStage};
use crate::runtime::telemetry::Telemetry;
use anyhow::anyhow;
use std::io;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Runs the console's jobs one after another, repainting on every transition.
///
/// The first failure halts the list: later jobs stay `Waiting` and further
/// calls to [`Runner::run_next`] are rejected.
pub struct Runner<C, S: Surface> {
    console: Console<C, S>,
    context: C,
    cursor: JobCursor,
    shutdown: CancellationToken,
    telemetry: Telemetry,
    halted: bool,
}

impl<C, S: Surface> Runner<C, S> {
    pub fn new(console: Console<C, S>, context: C) -> Self {
        Self::with_cancellation_token(console, context, CancellationToken::new())
    }

    pub fn with_cancellation_token(
        console: Console<C, S>,
        context: C,
        shutdown: CancellationToken,
    ) -> Self {
        let cursor = JobCursor::new(console.jobs().len());
        Self {
            console,
            context,
            cursor,
            shutdown,
            telemetry: Telemetry::default(),
            halted: false,
        }
    }

    /// Returns a clone of the shutdown token so callers can wire it to their
    /// own signal handlers. Cancelling it interrupts the job in flight.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn console(&self) -> &Console<C, S> {
        &self.console
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn cursor(&self) -> &JobCursor {
        &self.cursor
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn into_parts(self) -> (Console<C, S>, C) {
        (self.console, self.context)
    }

    /// Paints the initial checklist and runs every job in order, stopping at the
    /// first failure.
    pub async fn run_all(&mut self) -> Result<(), JobError> {
        let header = self.console.header().to_owned();
        self.console
            .redraw()
            .map_err(|err| JobError::render(&header, err))?;

        let outcome = loop {
            match self.run_next().await {
                Ok(Some(_)) => continue,
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            }
        };

        self.telemetry.log_summary();
        outcome
    }

    /// Runs the job under the cursor. Returns its index, or `None` once the
    /// list is exhausted.
    pub async fn run_next(&mut self) -> Result<Option<usize>, JobError> {
        let Some(index) = self.cursor.current() else {
            return Ok(None);
        };

        if self.halted {
            let name = self.job_name(index);
            return Err(JobError::new(
                name,
                JobStage::Order,
                anyhow!("job list halted after an earlier failure"),
            ));
        }

        let result = self.run_job(index).await;
        self.cursor.advance();
        if result.is_err() {
            self.halted = true;
        }
        result.map(|()| Some(index))
    }

    /// Shows `footer` below the job list.
    pub fn finish(&mut self, footer: Vec<String>) -> io::Result<()> {
        self.console.set_footer(footer)
    }

    async fn run_job(&mut self, index: usize) -> Result<(), JobError> {
        let name = self.job_name(index);
        if self.shutdown.is_cancelled() {
            return Err(JobError::new(name, JobStage::Interrupted, anyhow!("interrupted")));
        }

        let task = match self.console.job_mut(index) {
            Some(job) if job.status() == JobStatus::Waiting => job.take_task(),
            Some(job) => {
                return Err(JobError::new(
                    name,
                    JobStage::Order,
                    anyhow!("job already {:?}", job.status()),
                ))
            }
            None => None,
        };
        let Some(task) = task else {
            return Err(JobError::new(
                name,
                JobStage::Order,
                anyhow!("job has no task to run"),
            ));
        };

        if let Err(err) = self.console.set_job_status(index, JobStatus::InProgress) {
            // The task never ran; resolve the job without touching the surface again.
            if let Some(job) = self.console.job_mut(index) {
                job.set_status(JobStatus::Error);
            }
            self.telemetry.record_failure(&name, Duration::ZERO);
            tracing::error!(target: "mkxray::runner", job = %name, error = %err, "unable to draw job start");
            return Err(JobError::render(&name, err));
        }
        tracing::info!(target: "mkxray::runner", job = %name, index, "job started");

        let started = Instant::now();
        let decision = {
            let mut output = ConsoleOutput {
                console: &mut self.console,
                index,
            };
            let execution = task.execute(&mut self.context, &mut output);
            tokio::select! {
                result = execution => TaskDecision::Finished(result),
                _ = self.shutdown.cancelled() => TaskDecision::Cancelled,
            }
        };
        let elapsed = started.elapsed();

        let (status, failure) = match decision {
            TaskDecision::Finished(Ok(())) => {
                self.telemetry.record_ok(&name, elapsed);
                tracing::info!(
                    target: "mkxray::runner",
                    job = %name,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "job finished"
                );
                (JobStatus::Ok, None)
            }
            TaskDecision::Finished(Err(err)) => {
                self.telemetry.record_failure(&name, elapsed);
                tracing::error!(
                    target: "mkxray::runner",
                    job = %name,
                    error = %format!("{err:#}"),
                    "job failed"
                );
                (
                    JobStatus::Error,
                    Some(JobError::new(name.as_str(), JobStage::Execute, err)),
                )
            }
            TaskDecision::Cancelled => {
                self.telemetry.record_failure(&name, elapsed);
                tracing::warn!(target: "mkxray::runner", job = %name, "job interrupted");
                (
                    JobStatus::Error,
                    Some(JobError::new(
                        name.as_str(),
                        JobStage::Interrupted,
                        anyhow!("interrupted"),
                    )),
                )
            }
        };

        let redraw = self.console.set_job_status(index, status);
        match (failure, redraw) {
            (Some(err), _) => Err(err),
            (None, Err(err)) => Err(JobError::render(&name, err)),
            (None, Ok(())) => Ok(()),
        }
    }

    fn job_name(&self, index: usize) -> String {
        self.console
            .jobs()
            .get(index)
            .map(|job| job.name().to_owned())
            .unwrap_or_default()
    }
}

/// [`JobOutput`] bound to one job of a console.
struct ConsoleOutput<'c, C, S: Surface> {
    console: &'c mut Console<C, S>,
    index: usize,
}

impl<C, S: Surface> JobOutput for ConsoleOutput<'_, C, S> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.console.write_job_output(self.index, text)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.console.clear_job_output(self.index)
    }
}
