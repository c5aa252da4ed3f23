use crate::xray::command;
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::sync::OnceLock;

fn started_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"core: Xray .* started").expect("valid journal regex"))
}

/// Whether the journal excerpt shows the Xray core coming up.
pub fn shows_started(log: &str) -> bool {
    started_pattern().is_match(log)
}

/// Last `lines` journal entries of `unit`.
pub async fn tail(unit: &str, lines: usize) -> Result<String> {
    let count = lines.to_string();
    command::run("journalctl", ["-u", unit, "-n", count.as_str(), "--no-pager"])
        .await
        .with_context(|| format!("unable to get {unit} logs"))
}

/// Fails with the journal text unless the last entry reports a start.
pub async fn ensure_started(unit: &str) -> Result<()> {
    let log = tail(unit, 1).await?;
    if !shows_started(&log) {
        bail!(
            "something went wrong during {unit} restarting: {}",
            log.trim()
        );
    }
    Ok(())
}
