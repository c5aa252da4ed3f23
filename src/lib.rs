pub mod runtime;
pub mod steps;
pub mod xray;

pub use runtime::config::{SetupConfig, SetupConfigBuilder, SetupConfigParams};
pub use runtime::console::{Console, Palette};
pub use runtime::job::{Job, JobStatus};
pub use runtime::progress::JobCursor;
pub use runtime::runner::Runner;
pub use runtime::surface::{MemorySurface, Surface, SurfaceOp, TermSurface};
pub use runtime::task::{from_fn, FnTask, JobError, JobOutput, JobStage, Task, TaskFuture};
pub use runtime::telemetry::{init_tracing, Telemetry, TelemetrySnapshot};
pub use runtime::terminal::TerminalGuard;
pub use xray::XrayContext;
