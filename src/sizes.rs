//! Best-effort file size lookup for downloadable documents.
//!
//! Sizes are cached per path. Concurrent lookups of the same path share a
//! single probe; a failed probe is not cached and is never retried within
//! the same call.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::Client;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Result, SiteError};
use crate::site::showcase::format_file_size;

const USER_AGENT: &str = concat!("paperfolio/", env!("CARGO_PKG_VERSION"));

/// Label shown when a size cannot be determined.
pub const UNKNOWN_SIZE: &str = "Unknown size";

/// Resolve user agent from config value.
/// - None => default paperfolio user agent
/// - other => custom user agent string
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config {
        None => USER_AGENT.to_string(),
        Some(custom) => custom.to_string(),
    }
}

/// Source of a resource's byte size.
#[async_trait]
pub trait SizeProbe: Send + Sync {
    async fn probe(&self, path: &str) -> Result<u64>;
}

/// Fetches the resource over HTTP relative to the site's base URL.
///
/// Responses are not decoded, so `Content-Length` is the transferred size
/// the server reports.
pub struct HttpSizeProbe {
    client: Client,
    base_url: Url,
}

impl HttpSizeProbe {
    pub fn new(base_url: &str, timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(resolve_user_agent(user_agent))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl SizeProbe for HttpSizeProbe {
    async fn probe(&self, path: &str) -> Result<u64> {
        let url = self.base_url.join(path)?;
        debug!("Probing size of {}", url);
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(SiteError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let declared = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|len| *len > 0);
        if let Some(len) = declared {
            return Ok(len);
        }

        let body = response.bytes().await?;
        Ok(body.len() as u64)
    }
}

/// Reads sizes from files under a local site root.
pub struct LocalSizeProbe {
    root: PathBuf,
}

impl LocalSizeProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SizeProbe for LocalSizeProbe {
    async fn probe(&self, path: &str) -> Result<u64> {
        let full = self.root.join(path.trim_start_matches('/'));
        let meta = tokio::fs::metadata(&full)
            .await
            .map_err(|e| SiteError::io(&full, e))?;
        Ok(meta.len())
    }
}

/// Per-path cached size lookups.
pub struct SizeResolver {
    probe: Arc<dyn SizeProbe>,
    cache: Mutex<HashMap<String, Arc<OnceCell<u64>>>>,
}

impl SizeResolver {
    pub fn new(probe: Arc<dyn SizeProbe>) -> Self {
        Self {
            probe,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, path: &str) -> Arc<OnceCell<u64>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Size already known for `path`, without probing.
    pub fn cached(&self, path: &str) -> Option<u64> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(path).and_then(|cell| cell.get().copied())
    }

    pub async fn resolve(&self, path: &str) -> Result<u64> {
        let cell = self.cell(path);
        let size = cell
            .get_or_try_init(|| async { self.probe.probe(path).await })
            .await?;
        Ok(*size)
    }

    /// Display label for `path`, or `None` when there is nothing to probe.
    ///
    /// Failures are logged and reported as [`UNKNOWN_SIZE`].
    pub async fn resolve_label(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        match self.resolve(path).await {
            Ok(size) => Some(format_file_size(size as i64)),
            Err(e) => {
                warn!("Unable to determine file size for {}: {}", path, e);
                Some(UNKNOWN_SIZE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProbe {
        calls: AtomicUsize,
        size: Option<u64>,
    }

    #[async_trait]
    impl SizeProbe for CountingProbe {
        async fn probe(&self, path: &str) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.size.ok_or_else(|| SiteError::HttpStatus {
                url: path.to_string(),
                status: 404,
            })
        }
    }

    fn resolver(size: Option<u64>) -> (SizeResolver, Arc<CountingProbe>) {
        let probe = Arc::new(CountingProbe {
            calls: AtomicUsize::new(0),
            size,
        });
        (SizeResolver::new(probe.clone()), probe)
    }

    #[test]
    fn test_resolve_user_agent() {
        assert!(resolve_user_agent(None).starts_with("paperfolio/"));
        assert_eq!(resolve_user_agent(Some("MyBot/1.0")), "MyBot/1.0");
    }

    #[tokio::test]
    async fn test_repeated_lookups_probe_once() {
        let (resolver, probe) = resolver(Some(1_572_864));
        assert_eq!(resolver.cached("cv.pdf"), None);

        let (a, b) = tokio::join!(resolver.resolve("cv.pdf"), resolver.resolve("cv.pdf"));
        assert_eq!(a.unwrap(), 1_572_864);
        assert_eq!(b.unwrap(), 1_572_864);
        assert_eq!(resolver.resolve_label("cv.pdf").await.unwrap(), "1.50 MB");

        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached("cv.pdf"), Some(1_572_864));
    }

    #[tokio::test]
    async fn test_failure_reports_unknown_size() {
        let (resolver, probe) = resolver(None);
        assert_eq!(resolver.resolve_label("missing.pdf").await.unwrap(), UNKNOWN_SIZE);
        assert_eq!(resolver.cached("missing.pdf"), None);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_path_is_skipped() {
        let (resolver, probe) = resolver(Some(10));
        assert!(resolver.resolve_label("").await.is_none());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_probe_reads_file_size() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/cv.pdf"), vec![0u8; 2048]).unwrap();

        let probe = LocalSizeProbe::new(dir.path());
        assert_eq!(probe.probe("assets/cv.pdf").await.unwrap(), 2048);
        assert_eq!(probe.probe("/assets/cv.pdf").await.unwrap(), 2048);
        assert!(probe.probe("assets/none.pdf").await.is_err());
    }

    #[test]
    fn test_http_probe_base_url_gets_trailing_slash() {
        let probe =
            HttpSizeProbe::new("https://example.org/site", Duration::from_secs(5), None).unwrap();
        assert_eq!(probe.base_url().as_str(), "https://example.org/site/");
    }
}
