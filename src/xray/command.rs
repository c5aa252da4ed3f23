//! Thin wrapper over `tokio::process` for the one-shot CLI calls the setup
//! makes (`xray`, `openssl`, `dig`, `systemctl`, `journalctl`).

use anyhow::{bail, Context, Result};
use std::ffi::OsStr;
use std::process::Stdio;
use tokio::process::Command;

/// Runs `program` with `args`, returning its stdout. A non-zero exit is an
/// error carrying the trimmed stderr (or stdout when stderr is empty).
pub async fn run<I, S>(program: impl AsRef<OsStr>, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let name = program.to_string_lossy().into_owned();
    tracing::debug!(target: "mkxray::command", program = %name, "spawning command");

    let output = command
        .output()
        .await
        .with_context(|| format!("unable to run {name}"))?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => stdout.trim(),
            trimmed => trimmed,
        };
        tracing::debug!(
            target: "mkxray::command",
            program = %name,
            status = %output.status,
            "command failed"
        );
        if detail.is_empty() {
            bail!("{name} exited with {}", output.status);
        }
        bail!("{name} exited with {}: {detail}", output.status);
    }

    Ok(stdout)
}

/// Runs a command whose whole answer is a single line, e.g. `xray uuid`.
pub async fn run_line<I, S>(program: impl AsRef<OsStr>, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let stdout = run(program, args).await?;
    first_line(&stdout)
        .map(str::to_owned)
        .with_context(|| format!("{} printed nothing", program.to_string_lossy()))
}

/// First non-blank line of `text`, trimmed.
pub fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}
