use crate::runtime::task::Task;
use std::fmt;

/// Lifecycle of a job. `Ok` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Waiting,
    InProgress,
    Ok,
    Error,
}

impl JobStatus {
    /// Single-character glyph shown in front of the job name.
    pub fn marker(self) -> char {
        match self {
            JobStatus::Waiting => '-',
            JobStatus::InProgress => '=',
            JobStatus::Ok => '+',
            JobStatus::Error => 'x',
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, JobStatus::Ok | JobStatus::Error)
    }
}

/// A named unit of setup work.
pub struct Job<C> {
    name: String,
    status: JobStatus,
    output: String,
    task: Option<Box<dyn Task<C>>>,
}

impl<C> Job<C> {
    pub fn new(name: impl Into<String>, task: impl Task<C> + 'static) -> Self {
        Self {
            name: name.into(),
            status: JobStatus::Waiting,
            output: String::new(),
            task: Some(Box::new(task)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub(crate) fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    pub(crate) fn append_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub(crate) fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Hands the task to the runner. A job runs at most once, so the task is
    /// gone afterwards.
    pub(crate) fn take_task(&mut self) -> Option<Box<dyn Task<C>>> {
        self.task.take()
    }
}

impl<C> fmt::Debug for Job<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("output", &self.output)
            .field("pending", &self.task.is_some())
            .finish()
    }
}
