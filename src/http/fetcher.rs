use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use reqwest::blocking::Client;
use tracing::debug;
use crate::utils::{
    config::FetchConfig,
    error::{FetchError, ProbeError, ProbeResult},
};

/// Capability to issue an HTTP GET
pub trait Fetcher: Send + Sync {
    /// Send a GET to `url` and hand back the response with its body unread
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// A live response. The body is released when this value is dropped.
pub struct FetchResponse {
    status: u16,
    url: String,
    body: BufReader<Box<dyn Read + Send>>,
}

impl FetchResponse {
    pub fn new(status: u16, url: impl Into<String>, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            url: url.into(),
            body: BufReader::new(Box::new(body)),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fill the read buffer without consuming it, surfacing an unreadable body.
    ///
    /// Returns how many bytes are buffered; zero means the body is empty.
    pub fn peek(&mut self) -> Result<usize, FetchError> {
        Ok(self.body.fill_buf()?.len())
    }

    /// Read the remaining body as UTF-8 text
    pub fn text(mut self) -> Result<String, FetchError> {
        let mut text = String::new();
        self.body.read_to_string(&mut text)?;
        Ok(text)
    }
}

impl Read for FetchResponse {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}

impl BufRead for FetchResponse {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.body.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.body.consume(amt)
    }
}

impl fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchResponse")
            .field("status", &self.status)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Production fetcher backed by a blocking reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Fetcher with the default 10 second timeout
    pub fn new() -> ProbeResult<Self> {
        Self::with_config(&FetchConfig::default())
    }

    pub fn with_config(config: &FetchConfig) -> ProbeResult<Self> {
        config.validate()?;
        Self::with_timeout(config.timeout())
    }

    /// The timeout covers the whole request, body included
    pub fn with_timeout(timeout: Duration) -> ProbeResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Fetch(e.into()))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        debug!(%url, timeout_ms = self.timeout.as_millis() as u64, "GET");

        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        debug!(%url, status, "response received");
        Ok(FetchResponse::new(status, final_url, response))
    }
}

// Built on first use; `None` until then.
static SHARED_FETCHER: RwLock<Option<Arc<dyn Fetcher>>> = RwLock::new(None);

static FETCHER_OVERRIDE_LOCK: Mutex<()> = Mutex::new(());

/// The process-wide fetcher, building the default one on first call
pub fn shared_fetcher() -> ProbeResult<Arc<dyn Fetcher>> {
    if let Some(fetcher) = SHARED_FETCHER
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .as_ref()
    {
        return Ok(Arc::clone(fetcher));
    }

    let mut slot = SHARED_FETCHER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(fetcher) = slot.as_ref() {
        return Ok(Arc::clone(fetcher));
    }

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new()?);
    *slot = Some(Arc::clone(&fetcher));
    Ok(fetcher)
}

/// Make `fetcher` the process-wide fetcher for the rest of the run
pub fn install_fetcher(fetcher: Arc<dyn Fetcher>) {
    *SHARED_FETCHER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(fetcher);
}

/// Replace the process-wide fetcher until the returned guard is dropped
pub fn override_fetcher(fetcher: Arc<dyn Fetcher>) -> FetcherGuard {
    let lock = FETCHER_OVERRIDE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let previous = SHARED_FETCHER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .replace(fetcher);

    FetcherGuard {
        previous,
        _lock: lock,
    }
}

/// Restores the previous process-wide fetcher when dropped
pub struct FetcherGuard {
    previous: Option<Arc<dyn Fetcher>>,
    _lock: MutexGuard<'static, ()>,
}

impl Drop for FetcherGuard {
    fn drop(&mut self) {
        *SHARED_FETCHER
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = self.previous.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_peek_does_not_consume_body() {
        let mut response = FetchResponse::new(200, "http://x/status", Cursor::new(b"up".to_vec()));

        assert_eq!(response.peek().unwrap(), 2);
        assert_eq!(response.text().unwrap(), "up");
    }

    #[test]
    fn test_peek_on_empty_body() {
        let mut response = FetchResponse::new(204, "http://x/status", io::empty());
        assert_eq!(response.peek().unwrap(), 0);
    }

    #[test]
    fn test_success_status_range() {
        assert!(FetchResponse::new(200, "u", io::empty()).is_success());
        assert!(FetchResponse::new(299, "u", io::empty()).is_success());
        assert!(!FetchResponse::new(301, "u", io::empty()).is_success());
        assert!(!FetchResponse::new(503, "u", io::empty()).is_success());
    }

    #[test]
    fn test_http_fetcher_default_timeout() {
        let fetcher = HttpFetcher::new().unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_http_fetcher_rejects_zero_timeout() {
        let config = FetchConfig { timeout_secs: 0 };
        assert!(matches!(
            HttpFetcher::with_config(&config),
            Err(ProbeError::Configuration(_))
        ));
    }
}
