//! HTTP download of release archives.
//!
//! The [`Fetcher`] trait decouples resolution from the network. Tests use a
//! fetcher that serves archive bytes from memory.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Abstraction over archive download backends.
pub trait Fetcher {
    /// Stream the body at `url` into `dest`, returning the byte count.
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        (**self).fetch(url, dest)
    }
}

/// Blocking `reqwest` fetcher. No request timeout is applied.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(skip_all, fields(url = %url))]
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        debug!(
            status = %response.status(),
            length = ?response.content_length(),
            "response received"
        );
        let bytes = response
            .copy_to(dest)
            .with_context(|| format!("read body of {url}"))?;
        Ok(bytes)
    }
}
