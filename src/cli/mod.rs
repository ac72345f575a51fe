// CLI interface components
pub mod cli_args;
pub mod cli_runner;
pub mod reporter;

pub use cli_args::*;
pub use cli_runner::*;
pub use reporter::*;
