use tracing::{debug, warn};
use crate::cli::reporter::report_error;
use crate::http::fetcher::{shared_fetcher, FetchResponse, Fetcher};

/// GET `host + path` with the process-wide fetcher.
///
/// Failures are reported to the user (which terminates the process) and come
/// back as `None`; the caller never sees the raw error. `description` names
/// the service in messages, e.g. "Config Server".
pub fn fetch(host: &str, path: &str, description: &str) -> Option<FetchResponse> {
    match shared_fetcher() {
        Ok(fetcher) => fetch_with(fetcher.as_ref(), host, path, description),
        Err(e) => {
            warn!(error = %e, "HTTP client unavailable");
            report_error(
                Some(&e),
                &[&"Could not connect to ", &description.to_lowercase(), &" at ", &host],
            );
            None
        }
    }
}

/// Same as [`fetch`] with an explicit fetcher
pub fn fetch_with(
    fetcher: &dyn Fetcher,
    host: &str,
    path: &str,
    description: &str,
) -> Option<FetchResponse> {
    let url = format!("{}{}", host, path);
    debug!(%url, description, "fetching");

    let mut response = match fetcher.get(&url) {
        Ok(response) => response,
        Err(e) => {
            warn!(%url, error = %e, "request failed");
            report_error(
                Some(&e),
                &[&"Could not connect to ", &description.to_lowercase(), &" at ", &host],
            );
            return None;
        }
    };

    // Only the first buffer is checked; the rest is left for the caller.
    if let Err(e) = response.peek() {
        warn!(%url, error = %e, "response body unreadable");
        report_error(
            Some(&e),
            &[&"Error reading data from ", &description.to_lowercase(), &" at ", &host],
        );
        return None;
    }

    Some(response)
}
