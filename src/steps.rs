//! The provisioning job list shown by the `mkxray` binary.

pub mod configure;
pub mod install;
pub mod system;

use crate::runtime::config::SetupConfig;
use crate::runtime::console::Palette;
use crate::runtime::job::Job;
use crate::xray::XrayContext;

pub const HEADER: &str = "Setup mkxray, please wait...";
pub const COMPLETION_MESSAGE: &str =
    "All jobs completed! Import the following link into your Xray client:";

/// Every setup step, in execution order.
pub fn setup_jobs(config: &SetupConfig) -> Vec<Job<XrayContext>> {
    vec![
        Job::new("Check system", system::check_system()),
        Job::new("Check if root", system::check_root()),
        Job::new(
            "Download xray installer",
            install::DownloadInstaller::new(config),
        ),
        Job::new("Install xray", install::InstallXray::new(config)),
        Job::new("Check xray installation", install::CheckXray::new(config)),
        Job::new(
            "Generate xray context",
            configure::GenerateContext::new(config),
        ),
        Job::new("Write Xray config", configure::WriteConfig::new(config)),
        Job::new("Restart xray", configure::RestartXray::new(config)),
    ]
}

/// Lines shown under the checklist once every job succeeded.
pub fn completion_footer(palette: &Palette, ctx: &XrayContext) -> Vec<String> {
    vec![
        String::new(),
        palette.header(COMPLETION_MESSAGE),
        String::new(),
        ctx.vless_link.clone(),
        String::new(),
    ]
}
