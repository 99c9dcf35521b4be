use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::context::Context;

mod alias;
mod exec;
mod install;
mod root;
mod shims;
mod version;

#[derive(Debug, Parser)]
#[command(name = "gonv", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a command with the active Go version
    #[command(name = "exec", disable_help_flag = true)]
    Exec(exec::ExecArg),
    /// Regenerate shims for every installed executable
    #[command(name = "rehash")]
    Rehash,
    /// Install a Go version or a definition file
    #[command(alias = "i", name = "install")]
    Install(install::InstallArg),
    /// Remove an installed Go version
    #[command(alias = "rm", name = "uninstall")]
    Uninstall(install::UninstallArg),

    /// Show or set the version for the current directory
    #[command(name = "local")]
    Local(version::LocalArg),
    /// Show or set the global version
    #[command(name = "global")]
    Global(version::GlobalArg),
    /// Show the active version and where it was set
    #[command(name = "version")]
    Version,
    /// Show the active installed version names
    #[command(name = "version-name")]
    VersionName,
    /// Show where the active version was set
    #[command(name = "version-origin")]
    VersionOrigin,
    /// List installed versions
    #[command(alias = "ls", name = "versions")]
    Versions(version::VersionsArg),

    /// Show the full path of the executable a shim would run
    #[command(name = "which")]
    Which(shims::WhichArg),
    /// List installed versions that provide a command
    #[command(name = "whence")]
    Whence(shims::WhenceArg),
    /// List shim files
    #[command(name = "shims")]
    Shims(shims::ShimsArg),
    /// Manage version aliases
    #[command(name = "alias")]
    Alias(alias::AliasArg),

    /// Show the gonv root directory
    #[command(name = "root")]
    Root,
    /// Show the directory of a Go version
    #[command(name = "prefix")]
    Prefix(root::PrefixArg),
    /// List hook scripts for a command
    #[command(name = "hooks")]
    Hooks(root::HooksArg),
}

/// Run a command and return the process exit code.
pub fn run(app: App) -> Result<i32> {
    let ctx = Context::load()?;
    match app.cmd {
        Commands::Exec(arg) => exec::exec(&ctx, arg),
        Commands::Rehash => shims::rehash(&ctx),
        Commands::Install(arg) => install::install(&ctx, arg),
        Commands::Uninstall(arg) => install::uninstall(&ctx, arg),
        Commands::Local(arg) => version::local(&ctx, arg),
        Commands::Global(arg) => version::global(&ctx, arg),
        Commands::Version => version::version(&ctx),
        Commands::VersionName => version::version_name(&ctx),
        Commands::VersionOrigin => version::version_origin(&ctx),
        Commands::Versions(arg) => version::versions(&ctx, arg),
        Commands::Which(arg) => shims::which(&ctx, arg),
        Commands::Whence(arg) => shims::whence(&ctx, arg),
        Commands::Shims(arg) => shims::shims(&ctx, arg),
        Commands::Alias(arg) => alias::alias(&ctx, arg),
        Commands::Root => root::root(&ctx),
        Commands::Prefix(arg) => root::prefix(&ctx, arg),
        Commands::Hooks(arg) => root::hooks(&ctx, arg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() { App::command().debug_assert(); }

    #[test]
    fn test_exec_forwards_flags() {
        let app = App::try_parse_from(["gonv", "exec", "go", "build", "-v", "--help", "./..."]).unwrap();
        let Commands::Exec(arg) = app.cmd else {
            panic!("expected exec");
        };
        assert_eq!(arg.command, "go");
        let args: Vec<_> = arg.args.iter().filter_map(|a| a.to_str()).collect();
        assert_eq!(args, ["build", "-v", "--help", "./..."]);
    }

    #[test]
    fn test_install_flags() {
        let app = App::try_parse_from(["gonv", "install", "-fk", "--no-rehash", "1.21"]).unwrap();
        let Commands::Install(arg) = app.cmd else {
            panic!("expected install");
        };
        assert!(arg.force && arg.keep && arg.no_rehash && !arg.skip_existing);
        assert_eq!(arg.version.as_deref(), Some("1.21"));
    }
}
