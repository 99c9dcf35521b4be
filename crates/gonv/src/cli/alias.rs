use anyhow::Result;
use clap::{Args, Subcommand};
use tabled::Tabled;

use crate::context::Context;
use crate::ui::{FormatConfig, Formatter};

#[derive(Args, Debug)]
pub struct AliasArg {
    #[command(subcommand)]
    pub cmd: Option<AliasCommands>,
}

#[derive(Debug, Subcommand)]
pub enum AliasCommands {
    /// List aliases (the default)
    #[command(alias = "list", name = "ls")]
    Ls,
    /// Create or replace an alias; the target may be `:`-joined
    #[command(name = "set")]
    Set {
        name:    String,
        #[arg(id = "target", value_name = "VERSION")]
        version: String,
    },
    /// Delete an alias
    #[command(alias = "remove", name = "rm")]
    Rm { name: String },
}

#[derive(Tabled)]
struct AliasRow {
    alias:   String,
    version: String,
}

pub fn alias(ctx: &Context, arg: AliasArg) -> Result<i32> {
    match arg.cmd.unwrap_or(AliasCommands::Ls) {
        AliasCommands::Ls => {
            let aliases = ctx.store.aliases()?;
            if !aliases.is_empty() {
                let rows = aliases.into_iter().map(|(alias, version)| AliasRow { alias, version });
                println!("{}", Formatter::table(rows, FormatConfig { bare: true, ..Default::default() }));
            }
        }
        AliasCommands::Set { name, version } => ctx.store.set_alias(&name, &version)?,
        AliasCommands::Rm { name } => ctx.store.remove_alias(&name)?,
    }
    Ok(0)
}
