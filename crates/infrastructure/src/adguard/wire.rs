use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct RewriteRef<'a> {
    pub domain: &'a str,
    pub answer: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateRequest<'a> {
    pub target: RewriteRef<'a>,
    pub update: RewriteRef<'a>,
}

/// The server reports duplicate adds and missing deletes as HTTP 400 with a
/// plain-text reason.
pub(super) fn is_already_present(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    body.contains("already exists") || body.contains("already present")
}

pub(super) fn is_already_absent(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    body.contains("not found") || body.contains("does not exist") || body.contains("no such")
}
