pub mod rewrite_sync;

pub use rewrite_sync::RewriteSyncJob;
