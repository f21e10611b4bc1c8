#![allow(dead_code)]

pub mod fake_adguard;
pub mod fixtures;

pub use fake_adguard::FakeAdGuard;
pub use fixtures::{adguard_with, CacheDomains, Harness, PASS, TARGET, USER};
