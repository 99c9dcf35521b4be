use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Args;
use gonv_version::SYSTEM;

use crate::context::Context;

pub fn root(ctx: &Context) -> Result<i32> {
    println!("{}", ctx.store.root().display());
    Ok(0)
}

#[derive(Args, Debug)]
pub struct PrefixArg {
    /// Defaults to the active versions
    #[arg(id = "target", value_name = "VERSION")]
    pub version: Option<String>,
}

/// Distribution directories, `:`-joined when several versions are active.
pub fn prefix(ctx: &Context, arg: PrefixArg) -> Result<i32> {
    let names = match arg.version {
        Some(token) => vec![ctx.resolve_argument(&token)?],
        None => ctx.resolver().resolve_installed(&ctx.search_dir()?)?.names,
    };

    let mut prefixes = Vec::with_capacity(names.len());
    for name in &names {
        prefixes.push(prefix_of(ctx, name)?);
    }
    let joined: Vec<String> = prefixes.iter().map(|p| p.display().to_string()).collect();
    println!("{}", joined.join(":"));
    Ok(0)
}

fn prefix_of(ctx: &Context, name: &str) -> Result<PathBuf> {
    if name != SYSTEM {
        return Ok(ctx.store.version_dir(name));
    }
    // `<prefix>/bin/go`
    let go = ctx
        .system_command("go")?
        .ok_or_else(|| anyhow!("system version not found in PATH"))?;
    go.parent()
        .and_then(|bin| bin.parent())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("cannot determine the prefix of {}", go.display()))
}

#[derive(Args, Debug)]
pub struct HooksArg {
    /// Command whose hooks to list, e.g. `exec` or `install`
    pub command: String,
}

/// `<dir>/<command>/*.bash` for every directory on `GONV_HOOK_PATH`.
pub fn hooks(ctx: &Context, arg: HooksArg) -> Result<i32> {
    for dir in &ctx.config.hook_path {
        let Ok(entries) = std::fs::read_dir(dir.join(&arg.command)) else {
            continue;
        };
        let mut scripts: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "bash"))
            .collect();
        scripts.sort();
        for script in scripts {
            println!("{}", script.display());
        }
    }
    Ok(0)
}
