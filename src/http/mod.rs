// HTTP access behind the fetcher capability
pub mod fetcher;
pub mod mock_fetcher;
pub mod request;

pub use fetcher::*;
pub use mock_fetcher::*;
pub use request::*;
