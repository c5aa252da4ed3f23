use crate::xray::command;
use anyhow::{Context, Result};
use std::net::IpAddr;

/// Public address of this host as seen by OpenDNS.
pub async fn external_ip() -> Result<IpAddr> {
    let answer = command::run_line("dig", ["+short", "myip.opendns.com", "@resolver1.opendns.com"])
        .await
        .context("unable to get external ip")?;
    parse_ip(&answer)
}

pub fn parse_ip(answer: &str) -> Result<IpAddr> {
    answer
        .trim()
        .parse()
        .with_context(|| format!("resolver answered `{}` instead of an ip address", answer.trim()))
}
