use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// Implementations follow redirects, apply their own timeouts and turn error
/// statuses into errors.
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + 'static;

    /// Open a GET request and return the body as a stream.
    fn stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = std::result::Result<BoxStream<'static, std::result::Result<Bytes, Self::Error>>, Self::Error>>
    + Send;

    /// `Content-Length` from a HEAD request, if the server reports one.
    fn head(&self, url: &str) -> impl Future<Output = std::result::Result<Option<u64>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use super::*;
    use crate::{FetchError, Result};

    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// `timeout` bounds each request, body included.
        pub fn new(timeout: Duration) -> Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(concat!("gonv/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .map_err(|e| FetchError::Client(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn stream(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> std::result::Result<BoxStream<'static, std::result::Result<Bytes, Self::Error>>, Self::Error> {
            let mut request = self.client.get(url);
            for (key, value) in headers {
                request = request.header(key, value);
            }
            let response = request.send().await?.error_for_status()?;
            Ok(Box::pin(response.bytes_stream()))
        }

        async fn head(&self, url: &str) -> std::result::Result<Option<u64>, Self::Error> {
            let response = self.client.head(url).send().await?.error_for_status()?;
            Ok(response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok()))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
