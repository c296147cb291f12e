//! HTTP transport for the documentation API.
//!
//! [`Fetcher`] joins paths onto the configured base URL, consults a short-lived
//! response cache, validates payload shape, and retries transient failures with
//! exponential backoff. The network itself sits behind [`HttpBackend`] so the retry
//! and caching behaviour can be exercised without sockets.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{CacheConfig, HttpConfig};
use crate::memory_cache::MemoryCache;
use crate::{Error, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
                          (KHTML, like Gecko) Version/17.0 Safari/605.1.15";
const REFERER_URL: &str = "https://developer.apple.com/documentation";

/// Performs a single GET and decodes the body as JSON.
///
/// Implementations map non-success statuses to [`Error::HttpStatus`] and do not
/// retry; retrying is the caller's job.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch `url` and decode it.
    async fn get_json(&self, url: &str) -> Result<Value>;
}

/// Production backend built on `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    /// Build a client with browser-like headers and the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::InvalidResponse(format!("body of {url} is not JSON: {e}")))
    }
}

/// Retry schedule for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each attempt after that.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay to wait before `attempt` (1-based). The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt < 2 {
            return Duration::ZERO;
        }
        let shift = (attempt - 2).min(16);
        self.base_delay.saturating_mul(1 << shift)
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay: config.retry_base_delay(),
        }
    }
}

/// Reject payloads that decoded fine but carry no usable document.
pub fn validate_response(value: &Value) -> Result<()> {
    match value {
        Value::Null => Err(Error::InvalidResponse("response body is null".into())),
        Value::Array(_) => Ok(()),
        Value::Object(map) => {
            if map.is_empty() {
                return Err(Error::InvalidResponse("response body is an empty object".into()));
            }
            if let Some(err) = map.get("error") {
                return Err(Error::InvalidResponse(format!("upstream error: {err}")));
            }
            if map
                .get("errors")
                .and_then(Value::as_array)
                .is_some_and(|errors| !errors.is_empty())
            {
                return Err(Error::InvalidResponse("upstream returned errors".into()));
            }
            Ok(())
        },
        other => Err(Error::InvalidResponse(format!(
            "expected a JSON object or array, got {other}"
        ))),
    }
}

/// Retrying, caching HTTP client for documentation JSON.
pub struct Fetcher {
    backend: Arc<dyn HttpBackend>,
    cache: Mutex<MemoryCache<Value>>,
    base_url: String,
    policy: RetryPolicy,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    /// Create a fetcher using the production `reqwest` backend.
    pub fn new(http: &HttpConfig, cache: &CacheConfig) -> Result<Self> {
        let backend = ReqwestBackend::new(http.timeout())?;
        Ok(Self::with_backend(Arc::new(backend), http, cache))
    }

    /// Create a fetcher over an arbitrary backend.
    pub fn with_backend(
        backend: Arc<dyn HttpBackend>,
        http: &HttpConfig,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            backend,
            cache: Mutex::new(MemoryCache::new(cache.max_entries, cache.ttl())),
            base_url: http.base_url.trim_end_matches('/').to_string(),
            policy: RetryPolicy::from(http),
        }
    }

    /// Full URL for a documentation path. A leading `/` is tolerated.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch `path`, serving from the response cache when possible.
    #[tracing::instrument(skip(self))]
    pub async fn request(&self, path: &str) -> Result<Value> {
        let url = self.url_for(path);
        if let Some(hit) = self.cache.lock().await.get(&url) {
            debug!(%url, "response cache hit");
            return Ok(hit);
        }
        debug!(%url, "response cache miss");

        let value = self.fetch_with_retry(&url).await?;
        self.cache.lock().await.set(url, value.clone());
        Ok(value)
    }

    /// Fetch `<path>.json` and decode it into `T`.
    pub async fn get_documentation<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let path = path.trim_end_matches('/');
        let value = self.request(&format!("{path}.json")).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::Parse(format!("document at {path} has an unexpected shape: {e}")))
    }

    /// Drop every cached response.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    /// Number of cached responses.
    pub async fn cache_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<Value> {
        let mut attempt = 1;
        loop {
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                debug!(url, attempt, delay_ms = delay.as_millis(), "waiting before retry");
                tokio::time::sleep(delay).await;
            }

            let outcome = match self.backend.get_json(url).await {
                Ok(value) => validate_response(&value).map(|()| value),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(value) => {
                    info!(url, attempt, "fetched document");
                    return Ok(value);
                },
                Err(e) if e.is_recoverable() => {
                    warn!(url, attempt, error = %e, "transient fetch failure");
                    if attempt >= self.policy.max_attempts {
                        return Err(Error::RetriesExhausted {
                            attempts: attempt,
                            source: Box::new(e),
                        });
                    }
                    attempt += 1;
                },
                Err(e) => {
                    debug!(url, attempt, error = %e, category = e.category(), "permanent fetch failure");
                    return Err(e);
                },
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use tokio::time::Instant;

    /// Replays canned outcomes and records when each call happened.
    struct Scripted {
        outcomes: StdMutex<VecDeque<Result<Value>>>,
        calls: StdMutex<Vec<Instant>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<Value>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: StdMutex::new(outcomes.into()),
                calls: StdMutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpBackend for Scripted {
        async fn get_json(&self, url: &str) -> Result<Value> {
            self.calls.lock().unwrap().push(Instant::now());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Other(format!("no scripted outcome for {url}"))))
        }
    }

    fn status(code: u16) -> Result<Value> {
        Err(Error::HttpStatus {
            status: code,
            url: "https://example.test/x.json".into(),
        })
    }

    fn fetcher(backend: Arc<Scripted>, base_delay_ms: u64) -> Fetcher {
        let http = HttpConfig {
            base_url: "https://example.test/data/".into(),
            retry_base_delay_ms: base_delay_ms,
            max_retries: 3,
            ..HttpConfig::default()
        };
        Fetcher::with_backend(backend, &http, &CacheConfig::default())
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(100));
        assert_eq!(policy.delay_before(3), Duration::from_millis(200));
        assert_eq!(policy.delay_before(4), Duration::from_millis(400));
    }

    #[test]
    fn test_validate_response() {
        assert!(validate_response(&json!({"metadata": {}})).is_ok());
        assert!(validate_response(&json!([1])).is_ok());
        assert!(validate_response(&json!({"errors": []})).is_ok());

        for bad in [
            json!(null),
            json!({}),
            json!("text"),
            json!(42),
            json!({"error": "boom"}),
            json!({"errors": [{"message": "boom"}]}),
        ] {
            let err = validate_response(&bad).unwrap_err();
            assert!(matches!(err, Error::InvalidResponse(_)), "{bad} -> {err}");
        }
    }

    #[test]
    fn test_url_join_tolerates_slashes() {
        let f = fetcher(Scripted::new(vec![]), 10);
        assert_eq!(
            f.url_for("/documentation/swiftui.json"),
            "https://example.test/data/documentation/swiftui.json"
        );
        assert_eq!(
            f.url_for("documentation/swiftui.json"),
            "https://example.test/data/documentation/swiftui.json"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sequence_then_success() {
        let backend = Scripted::new(vec![status(503), status(503), Ok(json!({"ok": true}))]);
        let f = fetcher(Arc::clone(&backend), 100);

        let value = f.request("documentation/swiftui.json").await.unwrap();

        assert_eq!(value, json!({"ok": true}));
        let times = backend.call_times();
        assert_eq!(times.len(), 3);
        assert_eq!(times[1] - times[0], Duration::from_millis(100));
        assert_eq!(times[2] - times[1], Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_carries_last_error() {
        let backend = Scripted::new(vec![status(500), status(502), status(429)]);
        let f = fetcher(Arc::clone(&backend), 10);

        let err = f.request("a.json").await.unwrap_err();

        match &err {
            Error::RetriesExhausted { attempts, .. } => assert_eq!(*attempts, 3),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.http_status(), Some(429));
        assert_eq!(backend.call_times().len(), 3);
        assert_eq!(f.cache_len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_not_retried() {
        let backend = Scripted::new(vec![status(404), Ok(json!({"never": "reached"}))]);
        let f = fetcher(Arc::clone(&backend), 10);

        let err = f.request("missing.json").await.unwrap_err();

        assert_eq!(err.http_status(), Some(404));
        assert_eq!(backend.call_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_payload_is_not_cached_or_retried() {
        let backend = Scripted::new(vec![Ok(json!({})), Ok(json!({"title": "ok"}))]);
        let f = fetcher(Arc::clone(&backend), 10);

        let err = f.request("x.json").await.unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
        assert_eq!(f.cache_len().await, 0);

        let value = f.request("x.json").await.unwrap();
        assert_eq!(value["title"], "ok");
        assert_eq!(backend.call_times().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_skips_backend() {
        let backend = Scripted::new(vec![Ok(json!({"title": "View"}))]);
        let f = fetcher(Arc::clone(&backend), 10);

        f.request("/documentation/swiftui/view.json").await.unwrap();
        let second = f.request("documentation/swiftui/view.json").await.unwrap();

        assert_eq!(second["title"], "View");
        assert_eq!(backend.call_times().len(), 1);
        assert_eq!(f.cache_len().await, 1);

        f.clear_cache().await;
        assert_eq!(f.cache_len().await, 0);
    }
}
