use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;
use url::Url;
use crate::cli::{
    reporter::{report_error, report_error_with_hints, report_success},
    CliArgs, Commands,
};
use crate::http::{fetch, install_fetcher, HttpFetcher};
use crate::utils::{
    config::FetchConfig,
    error::{ProbeError, ProbeResult},
    logging::init_logging,
};

/// Check that `host` is an http(s) base URL
pub fn validate_host(host: &str) -> ProbeResult<()> {
    let url = Url::parse(host).map_err(|e| {
        ProbeError::InvalidArgument(format!("'{}' is not a valid URL: {}", host, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProbeError::InvalidArgument(format!(
            "'{}' uses unsupported scheme '{}'",
            host, other
        ))),
    }
}

/// Build the process-wide fetcher from a configuration file
pub fn load_fetcher(path: &str) -> ProbeResult<HttpFetcher> {
    let config = FetchConfig::from_file(path)?;
    debug!(path, timeout_secs = config.timeout_secs, "loaded fetch configuration");
    HttpFetcher::with_config(&config)
}

/// Run the status check. Returns whether the service is ready; on failure
/// the problem has already been reported.
pub fn check_status(host: &str, path: &str, service: &str, show_body: bool) -> anyhow::Result<bool> {
    if let Err(e) = validate_host(host) {
        report_error_with_hints(
            &e,
            &["Give the host with its scheme, e.g. http://localhost:19071"],
        );
        return Ok(false);
    }

    let Some(response) = fetch(host, path, service) else {
        return Ok(false);
    };

    if !response.is_success() {
        let err = ProbeError::UnexpectedStatus(response.status());
        report_error(Some(&err), &[&service, &" at ", &host, &" is not ready"]);
        return Ok(false);
    }

    report_success(&[&service, &" at ", &host, &" is ready"]);

    if show_body {
        let body = response
            .text()
            .with_context(|| format!("reading response body from {}{}", host, path))?;
        println!("{}", body);
    }

    Ok(true)
}

/// Main entry point for CLI execution
pub fn run_cli() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    if let Some(config_path) = &args.config {
        match load_fetcher(config_path) {
            Ok(fetcher) => install_fetcher(Arc::new(fetcher)),
            Err(e) => {
                report_error_with_hints(
                    &e,
                    &[
                        "The configuration file must be JSON, e.g. {\"timeout_secs\": 10}",
                        "timeout_secs must be a positive number of seconds",
                    ],
                );
                return Ok(());
            }
        }
    }

    match args.command {
        Commands::Status { host, path, service, show_body } => {
            check_status(&host, &path, &service, show_body)?;
        }
    }

    Ok(())
}
