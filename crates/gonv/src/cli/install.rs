use std::path::Path;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use console::style;
use gonv_fetch::{FetchOptions, Fetcher, HttpClient, ReqwestClient};
use gonv_install::{
    Definition, IndexCache, InstallError, InstallOptions, InstallOutcome, InstallTarget, Installer, RehashHook,
    ReleaseIndex, load_release_index,
};
use gonv_platform::GoTarget;
use gonv_version::VersionSpec;
use tabled::Tabled;

use crate::context::Context;
use crate::ui::{DownloadTracker, FormatConfig, Formatter, confirm};

#[derive(Args, Debug)]
pub struct InstallArg {
    /// Version (`1.21.0`, `1.21`, `latest`) or path to a definition file
    #[arg(id = "target", value_name = "VERSION")]
    pub version:       Option<String>,
    /// Reinstall even if already installed
    #[arg(short, long)]
    pub force:         bool,
    /// Do nothing if already installed
    #[arg(short, long, conflicts_with = "force")]
    pub skip_existing: bool,
    /// Keep the downloaded archive in the cache
    #[arg(short, long)]
    pub keep:          bool,
    /// List versions available for this platform
    #[arg(short, long, conflicts_with = "target")]
    pub list:          bool,
    /// Do not regenerate shims afterwards
    #[arg(long)]
    pub no_rehash:     bool,
}

#[derive(Args, Debug)]
pub struct UninstallArg {
    #[arg(id = "target", value_name = "VERSION")]
    pub version: String,
    /// Do not ask for confirmation
    #[arg(short, long)]
    pub force:   bool,
}

pub fn install(ctx: &Context, arg: InstallArg) -> Result<i32> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(install_async(ctx, arg))
}

async fn install_async(ctx: &Context, arg: InstallArg) -> Result<i32> {
    let fetcher = Fetcher::new(ReqwestClient::new(ctx.config.install_timeout)?);
    let fetch_options = FetchOptions::default().max_retries(ctx.config.install_retries);
    let host = GoTarget::host()?;

    if arg.list {
        let index = release_index(ctx, &fetcher, &fetch_options).await?;
        list_remote(&index, &host);
        return Ok(0);
    }

    let Some(request) = arg.version else {
        bail!("no version given; see `gonv install --list`");
    };

    let target = if Path::new(&request).is_file() {
        let definition = Definition::load(&request)?;
        InstallTarget::from_definition(&definition, &ctx.config.mirrors)?
    } else {
        let request = release_request(ctx, &request)?;
        let index = release_index(ctx, &fetcher, &fetch_options).await?;
        let release = index
            .find(&request)
            .ok_or_else(|| InstallError::NoSuchRelease(request.clone()))?;
        InstallTarget::from_release(release, &host, &ctx.config.mirrors)?
    }
    .preferred_mirror(ctx.config.preferred_mirror.clone());

    let tracker = DownloadTracker::new();
    let installer = Installer::new(&ctx.store, &fetcher)
        .fetch_options(fetch_options.on_progress(tracker.callback()))
        .hook(RehashHook::new(ctx.program()?));
    let options = InstallOptions::default()
        .force(arg.force)
        .skip_existing(arg.skip_existing)
        .keep(arg.keep)
        .rehash(!arg.no_rehash);

    let outcome = installer.install(&target, options).await;
    tracker.finish();
    match outcome? {
        InstallOutcome::Installed { name, path } => {
            eprintln!("{} go {name} installed to {}", style("✓").green().bold(), path.display());
        }
        InstallOutcome::Skipped { name } => {
            eprintln!("go {name} is already installed");
        }
    }
    Ok(0)
}

/// An alias names a release through the primary entry of its target.
fn release_request(ctx: &Context, request: &str) -> Result<String> {
    let request = request.trim();
    Ok(match ctx.store.alias(request)? {
        Some(target) => match VersionSpec::parse_joined(&target) {
            Some(spec) => spec.primary().to_string(),
            None => target,
        },
        None => request.to_string(),
    })
}

async fn release_index<C: HttpClient>(
    ctx: &Context,
    fetcher: &Fetcher<C>,
    options: &FetchOptions,
) -> Result<ReleaseIndex> {
    let cache = IndexCache::new(ctx.store.cache_dir());
    Ok(load_release_index(fetcher, &cache, ctx.config.offline, options).await?)
}

#[derive(Tabled)]
struct RemoteRow {
    version: String,
    stable:  &'static str,
    archive: String,
}

fn list_remote(index: &ReleaseIndex, host: &GoTarget) {
    let rows: Vec<RemoteRow> = index
        .sorted()
        .into_iter()
        .filter_map(|release| {
            let file = release.archive_for(host)?;
            Some(RemoteRow {
                version: release.name().to_string(),
                stable:  if release.stable { "yes" } else { "" },
                archive: file.filename.clone(),
            })
        })
        .collect();
    println!("{}", Formatter::table(rows, FormatConfig::default()));
}

pub fn uninstall(ctx: &Context, arg: UninstallArg) -> Result<i32> {
    // Exact names only, no partial matching.
    let name = gonv_version::normalize(arg.version.trim()).to_string();
    if name == gonv_version::SYSTEM {
        bail!("the system Go toolchain is not managed by gonv");
    }
    if !ctx.store.is_installed(&name) {
        return Err(InstallError::NotInstalled(name).into());
    }
    if !arg.force && !confirm(&format!("Uninstall go {name}?"))? {
        eprintln!("aborted");
        return Ok(1);
    }

    let rehash = RehashHook::new(ctx.program()?);
    let path = gonv_install::uninstall(&ctx.store, &name, &[&rehash])?;
    eprintln!("{} removed {}", style("✓").green().bold(), path.display());
    Ok(0)
}
