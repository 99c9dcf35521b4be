mod artifact;
mod fetcher;
mod http;

pub use artifact::Artifact;
pub use fetcher::Fetcher;
pub use http::{BoxStream, HttpClient};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
