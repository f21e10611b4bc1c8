//! AdGuard Home rewrite API adapter.
//!
//! Endpoints under `{api_base_url}/control/rewrite`:
//!
//! | call   | method | path      | body                                   |
//! |--------|--------|-----------|----------------------------------------|
//! | list   | GET    | `/list`   | none                                   |
//! | add    | POST   | `/add`    | `{domain, answer}`                     |
//! | delete | POST   | `/delete` | `{domain, answer}`                     |
//! | update | PUT    | `/update` | `{target:{domain,answer}, update:{..}}`|
//!
//! Older servers lack `/update`; the client detects that once and falls back
//! to add-then-delete for the rest of the process lifetime.

mod client;
mod wire;

pub use client::AdGuardRewriteClient;
