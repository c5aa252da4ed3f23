use crate::xray::command;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;

#[cfg(unix)]
const INSTALLER_MODE: u32 = 0o777;

/// Downloads the installer script from `url` into `path`, returning its size.
pub async fn download(url: &str, path: &Path, timeout: Duration) -> Result<usize> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("unable to build http client")?;

    let response = client
        .get(url)
        .send()
        .await
        .context("unable to download xray installer")?;
    let status = response.status();
    if !status.is_success() {
        bail!("failed to download xray installer: {status}");
    }

    let body = response
        .bytes()
        .await
        .context("unable to read xray installer")?;
    save(&body, path).await?;

    tracing::info!(
        target: "mkxray::installer",
        url,
        path = %path.display(),
        bytes = body.len(),
        "installer downloaded"
    );
    Ok(body.len())
}

/// Stores `script` at `path` and marks it executable.
pub async fn save(script: &[u8], path: &Path) -> Result<()> {
    tokio::fs::write(path, script)
        .await
        .context("unable to save xray installer")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(INSTALLER_MODE))
            .await
            .context("unable to make xray installer executable")?;
    }
    Ok(())
}

/// Runs the installer script with bash and returns what it printed.
pub async fn run(path: &Path) -> Result<String> {
    command::run("bash", [path])
        .await
        .context("unable to run xray installer")
}
