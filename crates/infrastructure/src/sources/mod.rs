mod index;
mod list_fetcher;

pub use index::HttpSourceIndex;
pub use list_fetcher::HttpListFetcher;
