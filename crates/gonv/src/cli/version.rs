use anyhow::{Context as _, Result, bail};
use clap::Args;
use gonv_resolve::{Resolution, VersionResolver, VersionSource};
use gonv_store::{unset_local, write_local};
use gonv_version::{SYSTEM, VersionSpec};

use crate::context::Context;

#[derive(Args, Debug)]
pub struct LocalArg {
    /// Versions to write to `.go-version`, highest priority first
    pub versions: Vec<String>,
    /// Remove `.go-version` from the current directory
    #[arg(long, conflicts_with = "versions")]
    pub unset:    bool,
}

#[derive(Args, Debug)]
pub struct GlobalArg {
    /// Versions to write to the global version file
    pub versions: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionsArg {
    /// Names only, without markers or the system entry
    #[arg(long)]
    pub bare: bool,
}

/// Every token must name an installed version, alias or `system`.
fn validated_spec(ctx: &Context, tokens: &[String], source: &VersionSource) -> Result<VersionSpec> {
    let spec = VersionSpec::new(tokens.iter().map(|t| t.trim().to_string()))?;
    let resolver = ctx.resolver();
    for token in &spec {
        resolver.resolve_version_spec(token, source)?;
    }
    Ok(spec)
}

pub fn local(ctx: &Context, arg: LocalArg) -> Result<i32> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;

    if arg.unset {
        unset_local(&cwd)?;
        return Ok(0);
    }

    if arg.versions.is_empty() {
        // Only the file lookup, not the environment or go.mod levels.
        let mut config = ctx.config.clone();
        config.version_override = None;
        config.gomod = false;
        match VersionResolver::new(&ctx.store, &config).resolve(&ctx.search_dir()?)? {
            Resolution {
                spec,
                source: VersionSource::LocalFile(_),
            } => print_spec(&spec),
            _ => bail!("no local version configured for this directory"),
        }
        return Ok(0);
    }

    let path = gonv_store::version_file::local_file(&cwd);
    let spec = validated_spec(ctx, &arg.versions, &VersionSource::LocalFile(path))?;
    write_local(&cwd, &spec)?;
    Ok(0)
}

pub fn global(ctx: &Context, arg: GlobalArg) -> Result<i32> {
    if arg.versions.is_empty() {
        match ctx.store.read_global()? {
            Some((_, spec)) => print_spec(&spec),
            None => println!("{SYSTEM}"),
        }
        return Ok(0);
    }

    let spec = validated_spec(ctx, &arg.versions, &VersionSource::GlobalFile(ctx.store.global_file()))?;
    ctx.store.write_global(&spec)?;
    Ok(0)
}

fn print_spec(spec: &VersionSpec) {
    for entry in spec {
        println!("{entry}");
    }
}

/// One `<name> (set by <source>)` line per entry; exit 1 if any entry is
/// not installed.
pub fn version(ctx: &Context) -> Result<i32> {
    let resolver = ctx.resolver();
    let resolution = resolver.resolve(&ctx.search_dir()?)?;
    let expanded = resolver.expand_aliases(&resolution.spec)?;

    let mut code = 0;
    for token in &expanded {
        match resolver.resolve_version_spec(token, &resolution.source) {
            Ok(name) => println!("{name} (set by {})", resolution.source),
            Err(e) => {
                eprintln!("gonv: {e}");
                code = 1;
            }
        }
    }
    Ok(code)
}

pub fn version_name(ctx: &Context) -> Result<i32> {
    let resolved = ctx.resolver().resolve_installed(&ctx.search_dir()?)?;
    println!("{}", resolved.names.join(":"));
    Ok(0)
}

pub fn version_origin(ctx: &Context) -> Result<i32> {
    let resolution = ctx.resolver().resolve(&ctx.search_dir()?)?;
    match resolution.source {
        VersionSource::Default => println!("{}", ctx.store.global_file().display()),
        source => println!("{source}"),
    }
    Ok(0)
}

pub fn versions(ctx: &Context, arg: VersionsArg) -> Result<i32> {
    let installed = ctx.store.installed()?;
    if arg.bare {
        for name in &installed {
            println!("{name}");
        }
        return Ok(0);
    }

    // An unresolvable spec marks nothing as active.
    let (active, source) = match ctx.resolver().resolve_installed(&ctx.search_dir()?) {
        Ok(resolved) => (resolved.names, Some(resolved.resolution.source)),
        Err(_) => (Vec::new(), None),
    };
    let line = |name: &str| match (&source, active.iter().any(|a| a == name)) {
        (Some(source), true) => format!("* {name} (set by {source})"),
        _ => format!("  {name}"),
    };

    if ctx.system_command("go")?.is_some() {
        println!("{}", line(SYSTEM));
    }
    for name in &installed {
        println!("{}", line(name));
    }
    Ok(0)
}
