use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use crate::http::fetcher::{FetchResponse, Fetcher};
use crate::utils::{config::DEFAULT_TIMEOUT_SECS, error::FetchError};

type Reply = dyn Fn(&str) -> Result<FetchResponse, FetchError> + Send + Sync;

/// Fetcher with canned replies for tests; never touches the network
pub struct MockFetcher {
    reply: Box<Reply>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Answer every request with `reply(url)`
    pub fn new(
        reply: impl Fn(&str) -> Result<FetchResponse, FetchError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Readable response with the given status and body
    pub fn with_response(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self::new(move |url| Ok(FetchResponse::new(status, url, Cursor::new(body.clone()))))
    }

    /// Fail every request with `error`
    pub fn with_error(error: FetchError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Connects, but the body fails on the first read.
    /// `drops` counts how many times a body was released.
    pub fn with_unreadable_body(message: &str, drops: DropCounter) -> Self {
        let message = message.to_string();
        Self::new(move |url| {
            let body = FailingBody {
                message: message.clone(),
                _drop: drops.track(),
            };
            Ok(FetchResponse::new(200, url, body))
        })
    }

    /// Server that takes `delay` to answer, checked against the default
    /// 10 second timeout on a simulated clock.
    pub fn with_delay(delay: Duration) -> Self {
        Self::with_delay_and_timeout(delay, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_delay_and_timeout(delay: Duration, timeout: Duration) -> Self {
        Self::new(move |url| {
            if delay > timeout {
                Err(FetchError::Timeout(format!(
                    "error sending request for url ({}): operation timed out",
                    url
                )))
            } else {
                Ok(FetchResponse::new(200, url, Cursor::new(Vec::new())))
            }
        })
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Fetcher for MockFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());
        (self.reply)(url)
    }
}

/// Counts releases of the bodies it tracks
#[derive(Debug, Clone, Default)]
pub struct DropCounter {
    count: Arc<AtomicUsize>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Token that bumps the count once when dropped
    pub fn track(&self) -> DropToken {
        DropToken {
            count: Arc::clone(&self.count),
        }
    }
}

pub struct DropToken {
    count: Arc<AtomicUsize>,
}

impl Drop for DropToken {
    fn drop(&mut self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Readable body that reports its release to a `DropCounter`
pub struct TrackedBody {
    inner: Cursor<Vec<u8>>,
    _drop: DropToken,
}

impl TrackedBody {
    pub fn new(body: impl Into<Vec<u8>>, drops: &DropCounter) -> Self {
        Self {
            inner: Cursor::new(body.into()),
            _drop: drops.track(),
        }
    }
}

impl Read for TrackedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

struct FailingBody {
    message: String,
    _drop: DropToken,
}

impl Read for FailingBody {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, self.message.clone()))
    }
}
