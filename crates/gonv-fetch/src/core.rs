mod retry;

pub use retry::retry_delay;
