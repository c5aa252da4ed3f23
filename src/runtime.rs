//! Checklist runtime: jobs, the console that paints them, the runner that
//! executes them in order, and the terminal/tracing plumbing around it.

pub mod config;
pub mod console;
pub mod hooks;
pub mod job;
pub mod progress;
pub mod runner;
pub mod surface;
pub mod task;
pub mod telemetry;
pub mod terminal;
