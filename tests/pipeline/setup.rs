use mkxray::steps::configure::WriteConfig;
use mkxray::steps::{completion_footer, HEADER};
use mkxray::{from_fn, Console, Job, JobStatus, MemorySurface, Palette, Runner, SetupConfig, XrayContext};
use serde_json::Value;

use crate::support::helpers::init_tracing;

fn fill_context(ctx: &mut XrayContext) -> anyhow::Result<()> {
    ctx.dest = "www.samsung.com:443".to_owned();
    ctx.server_name = "www.samsung.com".to_owned();
    ctx.listen_port = 443;
    ctx.shadowsocks_port = 23;
    ctx.private_key = "cKpXqW0pV3rKmjs0sFi4oYgpLmhk9GxjhgV2xW9WpWk".to_owned();
    ctx.public_key = "Wd0Xb7nHkbYe3uLq8Zxvn5XgC1f1iS1nq7s3mXh0XQ8".to_owned();
    ctx.client_id = "8f1c5f0e-2b7a-4c1e-9d6c-3b2a1f0e9d8c".to_owned();
    ctx.short_id = "a1b2c3d4e5f60718".to_owned();
    ctx.shadowsocks_key = "c2hhZG93c29ja3NrZXkxMg==".to_owned();
    ctx.external_ip = "203.0.113.7".to_owned();
    ctx.vless_link = ctx.share_link("mkxray");
    Ok(())
}

#[tokio::test]
async fn generated_context_is_written_as_server_config() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("xray").join("config.json");
    let config = SetupConfig::builder()
        .config_path(config_path.clone())
        .build()
        .unwrap();

    let jobs = vec![
        Job::new("Generate xray context", from_fn(fill_context)),
        Job::new("Write Xray config", WriteConfig::new(&config)),
    ];
    let palette = Palette::new(false);
    let console = Console::with_palette(HEADER, jobs, MemorySurface::new(), palette.clone());
    let mut runner = Runner::new(console, XrayContext::default());

    runner.run_all().await.unwrap();
    let footer = completion_footer(&palette, runner.context());
    runner.finish(footer).unwrap();

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
    let reality = &written["inbounds"][1]["streamSettings"]["realitySettings"];
    assert_eq!(reality["dest"], "www.samsung.com:443");
    assert_eq!(reality["serverNames"][0], "www.samsung.com");
    assert_eq!(reality["shortIds"][0], "a1b2c3d4e5f60718");
    assert_eq!(
        written["inbounds"][1]["settings"]["clients"][0]["id"],
        "8f1c5f0e-2b7a-4c1e-9d6c-3b2a1f0e9d8c"
    );
    assert_eq!(
        written["inbounds"][0]["settings"]["password"],
        "c2hhZG93c29ja3NrZXkxMg=="
    );

    let (console, ctx) = runner.into_parts();
    assert!(console.jobs().iter().all(|job| job.status() == JobStatus::Ok));
    let screen = console.surface().screen();
    assert_eq!(screen.last().map(String::as_str), Some(""));
    assert!(screen.iter().any(|line| *line == ctx.vless_link));
    assert!(ctx.vless_link.starts_with("vless://8f1c5f0e-2b7a-4c1e-9d6c-3b2a1f0e9d8c@203.0.113.7:443?"));
    assert!(ctx.vless_link.ends_with("#mkxray"));
}

#[tokio::test]
async fn rerun_replaces_a_read_only_config() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let config = SetupConfig::builder()
        .config_path(config_path.clone())
        .build()
        .unwrap();

    for port in [443, 8443] {
        let jobs = vec![
            Job::new(
                "Generate xray context",
                from_fn(move |ctx: &mut XrayContext| {
                    fill_context(ctx)?;
                    ctx.listen_port = port;
                    Ok(())
                }),
            ),
            Job::new("Write Xray config", WriteConfig::new(&config)),
        ];
        let console =
            Console::with_palette(HEADER, jobs, MemorySurface::new(), Palette::new(false));
        let mut runner = Runner::new(console, XrayContext::default());
        runner.run_all().await.unwrap();
    }

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(written["inbounds"][1]["port"], 8443);
}
