use crate::runtime::task::{from_fn, FnTask};
use crate::xray::XrayContext;
use anyhow::{bail, Result};
use nix::unistd::Uid;

pub fn check_system() -> FnTask<impl Fn(&mut XrayContext) -> Result<()>> {
    from_fn(|_: &mut XrayContext| ensure_linux(std::env::consts::OS))
}

pub fn check_root() -> FnTask<impl Fn(&mut XrayContext) -> Result<()>> {
    from_fn(|_: &mut XrayContext| ensure_root(Uid::effective()))
}

fn ensure_linux(os: &str) -> Result<()> {
    if os != "linux" {
        bail!("system is not linux");
    }
    Ok(())
}

fn ensure_root(uid: Uid) -> Result<()> {
    if !uid.is_root() {
        bail!("not root user");
    }
    Ok(())
}
