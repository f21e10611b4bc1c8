mod list_fetcher;
mod rewrite_directory;
mod snapshot_store;
mod source_index;

pub use list_fetcher::DomainListFetcher;
pub use rewrite_directory::RewriteDirectory;
pub use snapshot_store::SnapshotStore;
pub use source_index::SourceIndexProvider;
