use clap::{Parser, Subcommand};

/// Probe CLI - check that remote services answer on their status endpoints
#[derive(Parser, Debug)]
#[command(name = "probe")]
#[command(about = "Check the status of remote services over HTTP")]
#[command(version = "0.1.0")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON fetch configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that a service is ready
    Status {
        /// Base URL of the service, e.g. http://localhost:19071
        host: String,

        /// Status path appended to the host
        #[arg(short, long, default_value = "/ApplicationStatus")]
        path: String,

        /// Service name used in messages
        #[arg(short, long, default_value = "Config Server")]
        service: String,

        /// Print the response body after a successful check
        #[arg(long)]
        show_body: bool,
    },
}
