use anyhow::Result;
use clap::Args;
use gonv_shim::{Dispatcher, ShimRegistry};

use crate::context::Context;

pub fn rehash(ctx: &Context) -> Result<i32> {
    // Warnings are logged by the registry itself.
    ShimRegistry::new(&ctx.store, ctx.program()?).rehash()?;
    Ok(0)
}

#[derive(Args, Debug)]
pub struct WhichArg {
    pub command: String,
}

pub fn which(ctx: &Context, arg: WhichArg) -> Result<i32> {
    let cwd = ctx.search_dir()?;
    let resolver = ctx.resolver();
    let located = Dispatcher::new(&ctx.store, &resolver, &ctx.config).locate(&arg.command, &cwd)?;
    println!("{}", located.path.display());
    Ok(0)
}

#[derive(Args, Debug)]
pub struct WhenceArg {
    /// Print executable paths instead of version names
    #[arg(long)]
    pub path:    bool,
    pub command: String,
}

/// Exit status 1 when no installed version provides the command.
pub fn whence(ctx: &Context, arg: WhenceArg) -> Result<i32> {
    let resolver = ctx.resolver();
    let found = Dispatcher::new(&ctx.store, &resolver, &ctx.config).whence_paths(&arg.command)?;
    for (version, path) in &found {
        if arg.path {
            println!("{}", path.display());
        } else {
            println!("{version}");
        }
    }
    Ok(if found.is_empty() { 1 } else { 0 })
}

#[derive(Args, Debug)]
pub struct ShimsArg {
    /// Print file names only
    #[arg(long)]
    pub short: bool,
}

pub fn shims(ctx: &Context, arg: ShimsArg) -> Result<i32> {
    let registry = ShimRegistry::new(&ctx.store, ctx.program()?);
    for shim in registry.list_shims()? {
        match shim.file_name() {
            Some(name) if arg.short => println!("{}", name.to_string_lossy()),
            _ => println!("{}", shim.display()),
        }
    }
    Ok(0)
}
