use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DEST: &str = "www.samsung.com:443";
pub const DEFAULT_CONFIG_PATH: &str = "/usr/local/etc/xray/config.json";
pub const DEFAULT_INSTALLER_URL: &str = "https://raw.githubusercontent.com/XTLS/Xray-install/046d9aa2432b3a6241d73c3684ef4e512974b594/install-release.sh";
const INSTALLER_FILE_NAME: &str = "install-xray.sh";
const DEFAULT_LISTEN_PORT: u16 = 443;
const DEFAULT_SHADOWSOCKS_PORT: u16 = 23;
const DEFAULT_SERVICE_NAME: &str = "xray";
const DEFAULT_XRAY_BINARY: &str = "xray";
const DEFAULT_LINK_NAME: &str = "mkxray";
const DEFAULT_RESTART_SETTLE_SECS: u64 = 2;
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Settings for one provisioning run.
///
/// All instances must be constructed via [`SetupConfig::builder`] or [`SetupConfig::new`]
/// so invariants are validated before any job observes the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    dest: String,
    server_name: String,
    listen_port: u16,
    shadowsocks_port: u16,
    config_path: PathBuf,
    installer_url: String,
    installer_path: PathBuf,
    service_name: String,
    xray_binary: String,
    link_name: String,
    restart_settle: Duration,
    download_timeout: Duration,
}

pub struct SetupConfigParams {
    pub dest: String,
    pub server_name: String,
    pub listen_port: u16,
    pub shadowsocks_port: u16,
    pub config_path: PathBuf,
    pub installer_url: String,
    pub installer_path: PathBuf,
    pub service_name: String,
    pub xray_binary: String,
    pub link_name: String,
    pub restart_settle: Duration,
    pub download_timeout: Duration,
}

impl SetupConfig {
    /// Returns a builder where every value has a default.
    pub fn builder() -> SetupConfigBuilder {
        SetupConfigBuilder::default()
    }

    /// Constructs a configuration directly from the provided values and validates it.
    pub fn new(params: SetupConfigParams) -> Result<Self> {
        let SetupConfigParams {
            dest,
            server_name,
            listen_port,
            shadowsocks_port,
            config_path,
            installer_url,
            installer_path,
            service_name,
            xray_binary,
            link_name,
            restart_settle,
            download_timeout,
        } = params;

        let config = Self {
            dest: trimmed_string(dest),
            server_name: trimmed_string(server_name),
            listen_port,
            shadowsocks_port,
            config_path,
            installer_url: trimmed_string(installer_url),
            installer_path,
            service_name: trimmed_string(service_name),
            xray_binary: trimmed_string(xray_binary),
            link_name: trimmed_string(link_name),
            restart_settle,
            download_timeout,
        };

        config.validate()?;
        Ok(config)
    }

    /// REALITY destination (`host:port`) the server mimics.
    pub fn dest(&self) -> &str {
        &self.dest
    }

    /// SNI clients present; must be served by `dest`.
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Port of the VLESS inbound.
    pub fn listen_port(&self) -> u16 {
        self.listen_port
    }

    pub fn shadowsocks_port(&self) -> u16 {
        self.shadowsocks_port
    }

    /// Where the generated server config is written.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn installer_url(&self) -> &str {
        &self.installer_url
    }

    /// Where the downloaded installer script is stored before running it.
    pub fn installer_path(&self) -> &Path {
        &self.installer_path
    }

    /// systemd unit restarted after the config is written.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Program used for `version`, `uuid` and `x25519`.
    pub fn xray_binary(&self) -> &str {
        &self.xray_binary
    }

    /// Label appended to the share link.
    pub fn link_name(&self) -> &str {
        &self.link_name
    }

    /// Delay between restarting the service and reading its log.
    pub fn restart_settle(&self) -> Duration {
        self.restart_settle
    }

    pub fn download_timeout(&self) -> Duration {
        self.download_timeout
    }

    /// Performs validation on an existing configuration instance.
    pub fn validate(&self) -> Result<()> {
        let (host, _) = split_dest(&self.dest)?;
        if host.is_empty() {
            bail!("dest must include a host");
        }

        ensure_not_empty(&self.server_name, "server_name")?;
        if self.server_name.chars().any(char::is_whitespace) {
            bail!("server_name cannot contain whitespace");
        }

        if self.listen_port == 0 {
            bail!("listen_port must be greater than 0");
        }

        if self.shadowsocks_port == 0 {
            bail!("shadowsocks_port must be greater than 0");
        }

        if self.listen_port == self.shadowsocks_port {
            bail!(
                "listen_port and shadowsocks_port must differ (both are {})",
                self.listen_port
            );
        }

        if self.config_path.as_os_str().is_empty() {
            bail!("config_path cannot be empty");
        }

        if self.installer_path.as_os_str().is_empty() {
            bail!("installer_path cannot be empty");
        }

        validate_url(&self.installer_url)?;
        ensure_not_empty(&self.service_name, "service_name")?;
        ensure_not_empty(&self.xray_binary, "xray_binary")?;
        ensure_not_empty(&self.link_name, "link_name")?;

        if self.download_timeout.is_zero() {
            bail!("download_timeout must be greater than 0");
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct SetupConfigBuilder {
    dest: Option<String>,
    server_name: Option<String>,
    listen_port: Option<u16>,
    shadowsocks_port: Option<u16>,
    config_path: Option<PathBuf>,
    installer_url: Option<String>,
    installer_path: Option<PathBuf>,
    service_name: Option<String>,
    xray_binary: Option<String>,
    link_name: Option<String>,
    restart_settle: Option<Duration>,
    download_timeout: Option<Duration>,
}

impl SetupConfigBuilder {
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    pub fn listen_port(mut self, port: u16) -> Self {
        self.listen_port = Some(port);
        self
    }

    pub fn shadowsocks_port(mut self, port: u16) -> Self {
        self.shadowsocks_port = Some(port);
        self
    }

    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn installer_url(mut self, url: impl Into<String>) -> Self {
        self.installer_url = Some(url.into());
        self
    }

    pub fn installer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.installer_path = Some(path.into());
        self
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn xray_binary(mut self, binary: impl Into<String>) -> Self {
        self.xray_binary = Some(binary.into());
        self
    }

    pub fn link_name(mut self, name: impl Into<String>) -> Self {
        self.link_name = Some(name.into());
        self
    }

    pub fn restart_settle(mut self, delay: Duration) -> Self {
        self.restart_settle = Some(delay);
        self
    }

    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<SetupConfig> {
        let dest = self.dest.unwrap_or_else(|| DEFAULT_DEST.to_owned());
        let server_name = match self.server_name {
            Some(name) => name,
            None => split_dest(dest.trim())
                .map(|(host, _)| host.to_owned())
                .context("server_name cannot be derived from dest")?,
        };

        let params = SetupConfigParams {
            dest,
            server_name,
            listen_port: self.listen_port.unwrap_or(DEFAULT_LISTEN_PORT),
            shadowsocks_port: self.shadowsocks_port.unwrap_or(DEFAULT_SHADOWSOCKS_PORT),
            config_path: self
                .config_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            installer_url: self
                .installer_url
                .unwrap_or_else(|| DEFAULT_INSTALLER_URL.to_owned()),
            installer_path: self
                .installer_path
                .unwrap_or_else(|| std::env::temp_dir().join(INSTALLER_FILE_NAME)),
            service_name: self
                .service_name
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_owned()),
            xray_binary: self
                .xray_binary
                .unwrap_or_else(|| DEFAULT_XRAY_BINARY.to_owned()),
            link_name: self
                .link_name
                .unwrap_or_else(|| DEFAULT_LINK_NAME.to_owned()),
            restart_settle: self
                .restart_settle
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_RESTART_SETTLE_SECS)),
            download_timeout: self
                .download_timeout
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS)),
        };

        SetupConfig::new(params)
    }
}

/// Splits `host:port`, accepting bracketed IPv6 hosts.
pub fn split_dest(dest: &str) -> Result<(&str, u16)> {
    let (host, port) = dest
        .rsplit_once(':')
        .with_context(|| format!("dest `{dest}` must be host:port"))?;
    let port: u16 = port
        .parse()
        .with_context(|| format!("dest `{dest}` has an invalid port"))?;
    if port == 0 {
        bail!("dest `{dest}` port must be greater than 0");
    }
    let host = host
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host);
    Ok((host, port))
}

fn trimmed_string(value: String) -> String {
    value.trim().to_owned()
}

fn ensure_not_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{field} cannot be empty");
    }
    Ok(())
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("installer_url must start with http:// or https://");
    }
    Ok(())
}
