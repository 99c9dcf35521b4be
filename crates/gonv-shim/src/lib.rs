//! Shims and command dispatch.
//!
//! A shim is a tiny script in `<root>/shims` that re-invokes `gonv exec
//! <name>`. [`ShimRegistry`] keeps that directory in sync with the installed
//! distributions; [`Dispatcher`] is what runs behind it.
//!
//! ```no_run
//! use gonv_resolve::VersionResolver;
//! use gonv_shim::{Dispatcher, ShimRegistry};
//! use gonv_store::{Config, VersionStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let store = VersionStore::from_config(&config);
//! ShimRegistry::new(&store, std::env::current_exe()?).rehash()?;
//!
//! let resolver = VersionResolver::new(&store, &config);
//! let dispatcher = Dispatcher::new(&store, &resolver, &config);
//! let code = dispatcher.exec("go", &["version".into()], &config.search_dir()?)?;
//! std::process::exit(code);
//! # }
//! ```

mod dispatch;
mod error;
mod registry;
mod resolver;

pub use dispatch::{Dispatcher, Located, should_auto_rehash};
pub use error::{Result, ShimError};
pub use registry::{ManagedExecutables, RehashReport, ShimRegistry, Warning, shim_file_name};
pub use resolver::{ChainResolver, DistributionResolver, SystemResolver, TargetResolver};
