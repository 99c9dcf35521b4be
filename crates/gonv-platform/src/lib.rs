pub use error::{Error, Result};

pub mod arch;
pub mod dir;
pub mod env;
mod error;
pub mod exe;
pub mod os;
pub mod target;

pub use target::GoTarget;
