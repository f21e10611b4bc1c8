pub mod assembler;
pub mod budget;
pub mod diff;
pub mod retry;
pub mod rewrite_builder;
pub mod source_catalog;

pub use assembler::{Assembly, Collision, DesiredSetAssembler, SourceBuild};
pub use budget::RunBudget;
pub use diff::{compute_plan, RemovalPolicy};
pub use retry::RetryPolicy;
pub use rewrite_builder::{BuildOutput, RewriteBuilder};
pub use source_catalog::{join_url, SourceCatalog};
