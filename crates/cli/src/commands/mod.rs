mod list_sources;
mod run;

pub use list_sources::list_sources;
pub use run::run;
