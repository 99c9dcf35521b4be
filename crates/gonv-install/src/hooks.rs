//! Lifecycle hooks run after a distribution is published or removed.
//!
//! Hook failures are logged and never undo the operation they follow.

use std::path::{Path, PathBuf};

use gonv_shim::ShimRegistry;
use gonv_store::VersionStore;
use tracing::debug;

use crate::error::HookError;

/// What a hook sees of the installed (or just removed) distribution.
pub struct InstallContext<'a> {
    pub name:  &'a str,
    pub path:  &'a Path,
    pub store: &'a VersionStore,
}

pub trait InstallHook: Send + Sync {
    /// Name of this hook for log messages.
    fn name(&self) -> &'static str;

    fn post_install(&self, _ctx: &InstallContext<'_>) -> Result<(), HookError> { Ok(()) }

    fn post_uninstall(&self, _ctx: &InstallContext<'_>) -> Result<(), HookError> { Ok(()) }
}

/// Regenerates shims so new executables become reachable and removed ones stop resolving.
pub struct RehashHook {
    program: PathBuf,
}

impl RehashHook {
    /// `program` is the gonv binary the generated shims re-invoke.
    pub fn new(program: impl Into<PathBuf>) -> Self { Self { program: program.into() } }

    fn rehash(&self, store: &VersionStore) -> Result<(), HookError> {
        let report = ShimRegistry::new(store, self.program.clone()).rehash()?;
        debug!(
            written = report.written.len(),
            removed = report.removed.len(),
            "shims regenerated"
        );
        Ok(())
    }
}

impl InstallHook for RehashHook {
    fn name(&self) -> &'static str { "rehash" }

    fn post_install(&self, ctx: &InstallContext<'_>) -> Result<(), HookError> { self.rehash(ctx.store) }

    fn post_uninstall(&self, ctx: &InstallContext<'_>) -> Result<(), HookError> { self.rehash(ctx.store) }
}
