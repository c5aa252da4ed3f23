use crate::runtime::config::SetupConfig;
use crate::runtime::task::{JobOutput, Task, TaskFuture};
use crate::xray::{command, journal, keys, network, server_config, XrayContext};
use anyhow::Context;
use std::path::PathBuf;
use std::time::Duration;

/// Generates keys and ids, resolves the external address and builds the
/// share link.
pub struct GenerateContext {
    dest: String,
    server_name: String,
    listen_port: u16,
    shadowsocks_port: u16,
    xray_binary: String,
    link_name: String,
}

impl GenerateContext {
    pub fn new(config: &SetupConfig) -> Self {
        Self {
            dest: config.dest().to_owned(),
            server_name: config.server_name().to_owned(),
            listen_port: config.listen_port(),
            shadowsocks_port: config.shadowsocks_port(),
            xray_binary: config.xray_binary().to_owned(),
            link_name: config.link_name().to_owned(),
        }
    }
}

impl Task<XrayContext> for GenerateContext {
    fn execute<'a>(
        &'a self,
        ctx: &'a mut XrayContext,
        output: &'a mut dyn JobOutput,
    ) -> TaskFuture<'a> {
        Box::pin(async move {
            ctx.dest = self.dest.clone();
            ctx.server_name = self.server_name.clone();
            ctx.listen_port = self.listen_port;
            ctx.shadowsocks_port = self.shadowsocks_port;

            output.write("x25519 keys")?;
            let pair = keys::generate_key_pair(&self.xray_binary).await?;
            ctx.private_key = pair.private_key;
            ctx.public_key = pair.public_key;

            output.clear()?;
            output.write("client id and short id")?;
            ctx.client_id = keys::generate_uuid(&self.xray_binary).await?;
            ctx.short_id = keys::generate_short_id().await?;
            ctx.shadowsocks_key = keys::generate_shadowsocks_key().await?;

            output.clear()?;
            output.write("external ip")?;
            ctx.external_ip = network::external_ip().await?.to_string();

            ctx.vless_link = ctx.share_link(&self.link_name);
            output.clear()?;
            tracing::info!(
                target: "mkxray::steps",
                server_name = %ctx.server_name,
                external_ip = %ctx.external_ip,
                "xray context generated"
            );
            Ok(())
        })
    }
}

/// Writes the server config for the generated context.
pub struct WriteConfig {
    path: PathBuf,
}

impl WriteConfig {
    pub fn new(config: &SetupConfig) -> Self {
        Self {
            path: config.config_path().to_owned(),
        }
    }
}

impl Task<XrayContext> for WriteConfig {
    fn execute<'a>(
        &'a self,
        ctx: &'a mut XrayContext,
        _output: &'a mut dyn JobOutput,
    ) -> TaskFuture<'a> {
        Box::pin(async move { server_config::write(ctx, &self.path).await })
    }
}

/// Restarts the service and checks the journal for a successful start.
pub struct RestartXray {
    service: String,
    settle: Duration,
}

impl RestartXray {
    pub fn new(config: &SetupConfig) -> Self {
        Self {
            service: config.service_name().to_owned(),
            settle: config.restart_settle(),
        }
    }
}

impl Task<XrayContext> for RestartXray {
    fn execute<'a>(
        &'a self,
        _ctx: &'a mut XrayContext,
        output: &'a mut dyn JobOutput,
    ) -> TaskFuture<'a> {
        Box::pin(async move {
            command::run("systemctl", ["restart", self.service.as_str()])
                .await
                .with_context(|| format!("unable to restart {}", self.service))?;

            if !self.settle.is_zero() {
                output.write(&format!(
                    "waiting {}s for {} to start",
                    self.settle.as_secs_f32(),
                    self.service
                ))?;
                tokio::time::sleep(self.settle).await;
                output.clear()?;
            }

            journal::ensure_started(&self.service).await
        })
    }
}
