use std::ffi::OsString;

use anyhow::Result;
use clap::Args;
use gonv_shim::{Dispatcher, ShimRegistry, should_auto_rehash};
use tracing::{debug, warn};

use crate::context::Context;

#[derive(Args, Debug)]
pub struct ExecArg {
    /// Command to run, e.g. `go` or `gofmt`
    pub command: String,
    /// Arguments passed through unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args:    Vec<OsString>,
}

/// The shim entry point. Returns the child's exit code.
pub fn exec(ctx: &Context, arg: ExecArg) -> Result<i32> {
    let cwd = ctx.search_dir()?;
    let resolver = ctx.resolver();
    let dispatcher = Dispatcher::new(&ctx.store, &resolver, &ctx.config);
    let code = dispatcher.exec(&arg.command, &arg.args, &cwd)?;

    if code == 0 && ctx.config.auto_rehash && should_auto_rehash(&arg.command, &arg.args) {
        debug!("go install finished, rehashing");
        let rehashed = ctx
            .program()
            .and_then(|program| Ok(ShimRegistry::new(&ctx.store, program).rehash()?));
        if let Err(e) = rehashed {
            warn!(error = %e, "automatic rehash failed");
        }
    }
    Ok(code)
}
