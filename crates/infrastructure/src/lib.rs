pub mod adguard;
pub mod http;
pub mod snapshot;
pub mod sources;
