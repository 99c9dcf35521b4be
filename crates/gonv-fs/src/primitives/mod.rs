pub mod atomic_write;
pub mod publish_dir;

pub use atomic_write::{AtomicWriteOptions, atomic_write, read_optional};
pub use publish_dir::{
    PublishOptions, create_dir_all, publish_dir, remove_dir_all_if_exists, remove_file_if_exists,
    rename,
};
