pub mod cli;
pub mod http;
pub mod testing;
pub mod utils;

pub use cli::*;
pub use http::*;
pub use utils::*;
