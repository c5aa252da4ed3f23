//! Secrets and identifiers for a fresh server: the REALITY x25519 key pair,
//! the client UUID, the short id, and the shadowsocks key.

use crate::xray::command;
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Private/public x25519 key pair as printed by `xray x25519`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

fn private_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?mi)^\s*private\s*key:\s*(\S+)\s*$").expect("valid private key regex")
    })
}

fn public_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?mi)^\s*(?:public\s*key|password):\s*(\S+)\s*$")
            .expect("valid public key regex")
    })
}

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("valid uuid regex")
    })
}

/// Parses `xray x25519` output.
///
/// Older releases print `Private key:` / `Public key:`; newer ones print
/// `PrivateKey:` / `Password:`, where the password is the public key.
pub fn parse_x25519(output: &str) -> Result<KeyPair> {
    let private_key = private_key_pattern()
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .context("xray x25519 output has no private key")?;
    let public_key = public_key_pattern()
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .context("xray x25519 output has no public key")?;

    Ok(KeyPair {
        private_key,
        public_key,
    })
}

pub fn validate_uuid(value: &str) -> Result<()> {
    if !uuid_pattern().is_match(value) {
        bail!("`{value}` is not a uuid");
    }
    Ok(())
}

/// Short ids are up to 16 hex digits with an even length.
pub fn validate_short_id(value: &str) -> Result<()> {
    if value.len() > 16 || value.len() % 2 != 0 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("`{value}` is not a valid short id");
    }
    Ok(())
}

pub async fn generate_key_pair(xray: &str) -> Result<KeyPair> {
    let output = command::run(xray, ["x25519"])
        .await
        .context("unable to generate x25519 keys")?;
    parse_x25519(&output)
}

pub async fn generate_uuid(xray: &str) -> Result<String> {
    let uuid = command::run_line(xray, ["uuid"])
        .await
        .context("unable to generate client id")?;
    validate_uuid(&uuid)?;
    Ok(uuid)
}

pub async fn generate_short_id() -> Result<String> {
    let short_id = command::run_line("openssl", ["rand", "-hex", "8"])
        .await
        .context("unable to generate short id")?;
    validate_short_id(&short_id)?;
    Ok(short_id)
}

/// 16 random bytes, base64 encoded, as `2022-blake3-aes-128-gcm` expects.
pub async fn generate_shadowsocks_key() -> Result<String> {
    command::run_line("openssl", ["rand", "-base64", "16"])
        .await
        .context("unable to generate shadowsocks key")
}
