use anyhow::Error as AnyError;
use futures::future::LocalBoxFuture;
use std::io;

pub type TaskFuture<'a> = LocalBoxFuture<'a, Result<(), AnyError>>;

/// Enumerates where a [`JobError`] originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    /// The task itself reported a failure.
    Execute,
    /// The run was cancelled while the task was in flight.
    Interrupted,
    /// Drawing the checklist to the terminal failed.
    Render,
    /// The job was not in a runnable state.
    Order,
}

/// Error surfaced by the runner. Every instance halts the job list.
#[derive(Debug)]
pub struct JobError {
    job: String,
    stage: JobStage,
    source: AnyError,
}

impl JobError {
    pub fn new(job: impl Into<String>, stage: JobStage, source: AnyError) -> Self {
        Self {
            job: job.into(),
            stage,
            source,
        }
    }

    pub(crate) fn render(job: &str, source: io::Error) -> Self {
        Self::new(job, JobStage::Render, AnyError::new(source))
    }

    /// Name of the job that failed.
    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn stage(&self) -> JobStage {
        self.stage
    }

    pub fn is_interrupted(&self) -> bool {
        self.stage == JobStage::Interrupted
    }
}

impl core::fmt::Display for JobError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#}", self.source)
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Handle a running task uses to publish progress into its job's output buffer.
///
/// Every call repaints the checklist, so writes show up immediately.
pub trait JobOutput {
    /// Appends `text` to the job output.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Empties the job output.
    fn clear(&mut self) -> io::Result<()>;
}

/// Unit of work executed by a job.
///
/// `C` is the context shared by all jobs of a run. It is passed explicitly so a
/// task can read what earlier tasks produced and leave results for later ones.
pub trait Task<C> {
    fn execute<'a>(&'a self, ctx: &'a mut C, output: &'a mut dyn JobOutput) -> TaskFuture<'a>;
}

/// Adapts a synchronous closure into a [`Task`]. Build it with [`from_fn`].
pub struct FnTask<F>(F);

pub fn from_fn<C, F>(f: F) -> FnTask<F>
where
    F: Fn(&mut C) -> Result<(), AnyError>,
{
    FnTask(f)
}

impl<C, F> Task<C> for FnTask<F>
where
    F: Fn(&mut C) -> Result<(), AnyError>,
{
    fn execute<'a>(&'a self, ctx: &'a mut C, _output: &'a mut dyn JobOutput) -> TaskFuture<'a> {
        let result = (self.0)(ctx);
        Box::pin(async move { result })
    }
}
