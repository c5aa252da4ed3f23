//! Server-side `config.json`: a shadowsocks inbound plus a VLESS+REALITY
//! inbound, with direct and blackhole outbounds.

use crate::xray::context::XrayContext;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;

const SHADOWSOCKS_METHOD: &str = "2022-blake3-aes-128-gcm";
const CLIENT_FLOW: &str = "xtls-rprx-vision";
const CLIENT_EMAIL: &str = "user1@myserver";
#[cfg(unix)]
const CONFIG_MODE: u32 = 0o444;

/// Builds the server configuration document for `ctx`.
pub fn render(ctx: &XrayContext) -> Value {
    json!({
        "log": {
            "loglevel": "info"
        },
        "routing": {
            "rules": [],
            "domainStrategy": "AsIs"
        },
        "inbounds": [
            {
                "port": ctx.shadowsocks_port,
                "tag": "ss",
                "protocol": "shadowsocks",
                "settings": {
                    "method": SHADOWSOCKS_METHOD,
                    "password": ctx.shadowsocks_key,
                    "network": "tcp,udp"
                }
            },
            {
                "port": ctx.listen_port,
                "protocol": "vless",
                "tag": "vless_tls",
                "settings": {
                    "clients": [
                        {
                            "id": ctx.client_id,
                            "email": CLIENT_EMAIL,
                            "flow": CLIENT_FLOW
                        }
                    ],
                    "decryption": "none"
                },
                "streamSettings": {
                    "network": "tcp",
                    "security": "reality",
                    "realitySettings": {
                        "show": false,
                        "dest": ctx.dest,
                        "xver": 0,
                        "serverNames": [ctx.server_name],
                        "privateKey": ctx.private_key,
                        "minClientVer": "",
                        "maxClientVer": "",
                        "maxTimeDiff": 0,
                        "shortIds": [ctx.short_id]
                    }
                },
                "sniffing": {
                    "enabled": true,
                    "destOverride": ["http", "tls"]
                }
            }
        ],
        "outbounds": [
            {
                "protocol": "freedom",
                "tag": "direct"
            },
            {
                "protocol": "blackhole",
                "tag": "block"
            }
        ]
    })
}

/// Writes the rendered config to `path` as read-only pretty JSON, creating
/// parent directories and replacing any previous file.
pub async fn write(ctx: &XrayContext, path: &Path) -> Result<()> {
    let body = serde_json::to_string_pretty(&render(ctx)).context("unable to encode xray config")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("unable to create {}", parent.display()))?;
    }

    // A previous run leaves a read-only file behind.
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("unable to replace {}", path.display()));
        }
    }

    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("unable to write xray config file {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(CONFIG_MODE))
            .await
            .with_context(|| format!("unable to set permissions on {}", path.display()))?;
    }

    tracing::info!(target: "mkxray::config", path = %path.display(), "xray config written");
    Ok(())
}
