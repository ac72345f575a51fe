// Utility modules
pub mod error;
pub mod config;
pub mod exit;
pub mod logging;

pub use error::*;
pub use config::*;
pub use exit::*;
pub use logging::*;
