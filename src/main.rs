use anyhow::Result;
use clap::Parser;
use mkxray::runtime::config::DEFAULT_CONFIG_PATH;
use mkxray::steps::{self, HEADER};
use mkxray::{
    init_tracing, Console, JobError, Palette, Runner, SetupConfig, Surface, TermSurface,
    TerminalGuard, XrayContext,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

/// Installs Xray and configures a VLESS+REALITY server on this host.
#[derive(Parser, Debug)]
#[command(name = "mkxray", version, about, long_about = None)]
struct Cli {
    /// Address (host:port) the REALITY inbound mimics
    #[arg(long, env = "MKXRAY_ADDR", default_value = mkxray::runtime::config::DEFAULT_DEST)]
    addr: String,

    /// SNI clients use; defaults to the host part of --addr
    #[arg(long, env = "MKXRAY_SERVER_NAME")]
    server_name: Option<String>,

    /// Port of the VLESS inbound
    #[arg(long, default_value_t = 443)]
    port: u16,

    /// Where the server config is written
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config_path: PathBuf,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,
}

impl Cli {
    fn to_setup_config(&self) -> Result<SetupConfig> {
        let mut builder = SetupConfig::builder()
            .dest(self.addr.as_str())
            .listen_port(self.port)
            .config_path(self.config_path.clone());
        if let Some(name) = &self.server_name {
            builder = builder.server_name(name.as_str());
        }
        builder.build()
    }
}

/// Rewrites the single-dash `-addr` spelling used by older install commands
/// into `--addr`.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-addr") => OsString::from("--addr"),
            Some(value) if value.starts_with("-addr=") => OsString::from(format!("-{value}")),
            _ => arg,
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Err(err) = init_tracing(cli.log_file.as_deref()) {
        eprintln!("ERROR: unable to open log file: {err}");
        return ExitCode::from(EXIT_USAGE);
    }

    let surface = TermSurface::stdout();
    let palette = Palette::new(!cli.no_color && surface.supports_color());

    let config = match cli.to_setup_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", palette.error_message(&format!("{err:#}")));
            return ExitCode::from(EXIT_USAGE);
        }
    };
    tracing::info!(target: "mkxray", ?config, "starting setup");

    run(config, surface, palette).await
}

async fn run(config: SetupConfig, surface: TermSurface, palette: Palette) -> ExitCode {
    let console = Console::with_palette(
        HEADER,
        steps::setup_jobs(&config),
        surface.clone(),
        palette.clone(),
    );
    let mut runner = Runner::new(console, XrayContext::default());

    let shutdown = runner.cancellation_token();
    let signals = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!(target: "mkxray", "Ctrl-C received; interrupting setup");
            shutdown.cancel();
        }
    });
    // Let the handler register before any job runs.
    tokio::task::yield_now().await;

    let _terminal = TerminalGuard::acquire(surface.term().clone());
    let outcome = runner.run_all().await;
    signals.abort();

    ExitCode::from(conclude(&mut runner, outcome, &palette))
}

/// Paints the closing footer (share link or error line) and picks the exit
/// status for `outcome`.
fn conclude<S: Surface>(
    runner: &mut Runner<XrayContext, S>,
    outcome: Result<(), JobError>,
    palette: &Palette,
) -> u8 {
    let (footer, status) = match &outcome {
        Ok(()) => (
            steps::completion_footer(palette, runner.context()),
            EXIT_SUCCESS,
        ),
        Err(err) if err.is_interrupted() => {
            (vec![palette.error_message(&err.to_string())], EXIT_INTERRUPTED)
        }
        Err(err) => (vec![palette.error_message(&err.to_string())], EXIT_FAILURE),
    };

    if let Err(draw_err) = runner.finish(footer.clone()) {
        tracing::warn!(target: "mkxray", error = %draw_err, "failed to draw closing lines");
        for line in footer {
            println!("{line}");
        }
    }
    status
}
