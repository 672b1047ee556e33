//! Page retrieval for wiki requests, plus the inter-request throttle.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;

/// Trait for page retrieval - enables mocking for tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the raw markup at `path` (relative to the source's base), or
    /// an empty string on any failure. Callers treat empty content as "page
    /// unreachable" and never see transport errors or status codes.
    async fn fetch(&self, path: &str) -> String;

    /// Waits a bounded random interval between requests and returns the
    /// seconds waited. Pure pacing; the return value only matters to tests.
    async fn throttle(&self) -> f64;
}

/// Wiki page client with request pacing and optional source saving.
///
/// A `base_url` that does not start with `http` is treated as a local
/// directory of previously saved pages, which makes offline runs work with
/// the exact same call sites.
pub struct WikiClient {
    client: Client,
    base_url: String,
    delay_min_secs: f64,
    delay_max_secs: f64,
    save_source: bool,
    save_path: PathBuf,
}

impl WikiClient {
    /// Creates a new wiki client from the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            delay_min_secs: config.delay_min_secs,
            delay_max_secs: config.delay_max_secs,
            save_source: config.save_source,
            save_path: PathBuf::from(&config.save_path),
        })
    }

    /// Creates a client with a custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: impl Into<String>) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url.into();
        Ok(client)
    }

    fn is_remote(&self) -> bool {
        self.base_url.starts_with("http")
    }

    /// Performs a GET request and returns the body.
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    fn save(&self, path: &str, content: &str) {
        let file = self.save_path.join(file_name_for(path));
        if let Err(e) = std::fs::create_dir_all(&self.save_path) {
            warn!("Could not create save directory {}: {}", self.save_path.display(), e);
            return;
        }
        match std::fs::write(&file, content) {
            Ok(()) => debug!("Saved source to {}", file.display()),
            Err(e) => warn!("Could not save source {}: {}", file.display(), e),
        }
    }
}

/// Derives a file name for a saved page from its wiki path.
fn file_name_for(path: &str) -> String {
    let name: String = path
        .trim_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if name.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}.html", name)
    }
}

#[async_trait]
impl PageSource for WikiClient {
    async fn fetch(&self, path: &str) -> String {
        let locator = format!("{}{}", self.base_url, path);

        if !self.is_remote() {
            return std::fs::read_to_string(&locator).unwrap_or_else(|e| {
                warn!("Could not read local copy {}: {}", locator, e);
                String::new()
            });
        }

        match self.get(&locator).await {
            Ok(content) => {
                if self.save_source {
                    self.save(path, &content);
                }
                content
            }
            Err(e) => {
                warn!("Fetch failed for {}: {}", locator, e);
                String::new()
            }
        }
    }

    async fn throttle(&self) -> f64 {
        let secs = if self.delay_max_secs > self.delay_min_secs {
            rand::rng().random_range(self.delay_min_secs..=self.delay_max_secs)
        } else {
            self.delay_min_secs
        };

        if secs > 0.0 {
            debug!("Delaying {:.2}s", secs);
            tokio::time::sleep(Duration::from_secs_f64(secs)).await;
        }
        secs
    }
}
