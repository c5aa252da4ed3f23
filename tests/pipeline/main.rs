#[path = "../support/mod.rs"]
mod support;

mod rendering;
mod runner;
mod setup;
