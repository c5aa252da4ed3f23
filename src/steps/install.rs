use crate::runtime::config::SetupConfig;
use crate::runtime::task::{JobOutput, Task, TaskFuture};
use crate::xray::command::{self, first_line};
use crate::xray::{installer, XrayContext};
use anyhow::Context;
use std::path::PathBuf;
use std::time::Duration;

/// Fetches the pinned installer script.
pub struct DownloadInstaller {
    url: String,
    path: PathBuf,
    timeout: Duration,
}

impl DownloadInstaller {
    pub fn new(config: &SetupConfig) -> Self {
        Self {
            url: config.installer_url().to_owned(),
            path: config.installer_path().to_owned(),
            timeout: config.download_timeout(),
        }
    }
}

impl Task<XrayContext> for DownloadInstaller {
    fn execute<'a>(
        &'a self,
        _ctx: &'a mut XrayContext,
        output: &'a mut dyn JobOutput,
    ) -> TaskFuture<'a> {
        Box::pin(async move {
            output.write(&format!("fetching {}", self.url))?;
            let bytes = installer::download(&self.url, &self.path, self.timeout).await?;
            output.clear()?;
            tracing::debug!(target: "mkxray::steps", bytes, "installer saved");
            Ok(())
        })
    }
}

/// Runs the downloaded installer.
pub struct InstallXray {
    path: PathBuf,
}

impl InstallXray {
    pub fn new(config: &SetupConfig) -> Self {
        Self {
            path: config.installer_path().to_owned(),
        }
    }
}

impl Task<XrayContext> for InstallXray {
    fn execute<'a>(
        &'a self,
        _ctx: &'a mut XrayContext,
        output: &'a mut dyn JobOutput,
    ) -> TaskFuture<'a> {
        Box::pin(async move {
            output.write(&format!("running {}", self.path.display()))?;
            let log = installer::run(&self.path).await?;
            output.clear()?;
            tracing::debug!(target: "mkxray::steps", installer_output = %log.trim(), "installer finished");
            Ok(())
        })
    }
}

/// Confirms the `xray` binary is callable; shows its version line.
pub struct CheckXray {
    binary: String,
}

impl CheckXray {
    pub fn new(config: &SetupConfig) -> Self {
        Self {
            binary: config.xray_binary().to_owned(),
        }
    }
}

impl Task<XrayContext> for CheckXray {
    fn execute<'a>(
        &'a self,
        _ctx: &'a mut XrayContext,
        output: &'a mut dyn JobOutput,
    ) -> TaskFuture<'a> {
        Box::pin(async move {
            let version = command::run(&self.binary, ["version"])
                .await
                .context("xray wasn't installed successfully")?;
            if let Some(line) = first_line(&version) {
                output.write(line)?;
            }
            Ok(())
        })
    }
}
