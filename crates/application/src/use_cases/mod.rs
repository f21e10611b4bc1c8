pub mod fetch_sources;
pub mod list_sources;
pub mod reconcile;

pub use fetch_sources::{FetchSourcesUseCase, SourceFetch};
pub use list_sources::ListSourcesUseCase;
pub use reconcile::{ReconcileSettings, ReconcileUseCase};
