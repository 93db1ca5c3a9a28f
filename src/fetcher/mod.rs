pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::HtmlFetcher;
pub use errors::{FetchError, NetworkError};
pub use types::PageResponse;
