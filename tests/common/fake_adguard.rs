use lancache_sync_domain::RewriteEntry;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{any, basic_auth};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Stateful stand-in for AdGuard Home's rewrite API.
#[derive(Clone)]
pub struct FakeAdGuard {
    table: Arc<Mutex<Vec<RewriteEntry>>>,
    mutations: Arc<AtomicU64>,
    supports_update: bool,
}

impl FakeAdGuard {
    pub fn new(entries: Vec<(&str, &str)>) -> Self {
        Self {
            table: Arc::new(Mutex::new(
                entries
                    .into_iter()
                    .map(|(d, a)| RewriteEntry::new(d, a))
                    .collect(),
            )),
            mutations: Arc::new(AtomicU64::new(0)),
            supports_update: true,
        }
    }

    /// Behave like a server that predates `/control/rewrite/update`.
    pub fn without_update(mut self) -> Self {
        self.supports_update = false;
        self
    }

    /// Serve the API on `server`, rejecting anything not carrying `user:pass`.
    pub async fn mount(&self, server: &MockServer, user: &str, pass: &str) {
        Mock::given(basic_auth(user, pass))
            .respond_with(self.clone())
            .with_priority(1)
            .mount(server)
            .await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .with_priority(10)
            .mount(server)
            .await;
    }

    pub fn answer(&self, domain: &str) -> Option<String> {
        self.table
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.domain == domain)
            .map(|e| e.answer.clone())
    }

    pub fn entries(&self) -> Vec<RewriteEntry> {
        self.table.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> u64 {
        self.mutations.load(Ordering::SeqCst)
    }
}

fn entry(value: &Value) -> Option<RewriteEntry> {
    serde_json::from_value(value.clone()).ok()
}

impl Respond for FakeAdGuard {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut table = self.table.lock().unwrap();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);

        match (request.method.as_str(), request.url.path()) {
            ("GET", "/control/rewrite/list") => ResponseTemplate::new(200).set_body_json(&*table),
            ("POST", "/control/rewrite/add") => {
                self.mutations.fetch_add(1, Ordering::SeqCst);
                let Some(new) = entry(&body) else {
                    return ResponseTemplate::new(400).set_body_string("bad request");
                };
                if table.contains(&new) {
                    return ResponseTemplate::new(400).set_body_string("rewrite already exists");
                }
                table.push(new);
                ResponseTemplate::new(200)
            }
            ("POST", "/control/rewrite/delete") => {
                self.mutations.fetch_add(1, Ordering::SeqCst);
                let Some(old) = entry(&body) else {
                    return ResponseTemplate::new(400).set_body_string("bad request");
                };
                let before = table.len();
                table.retain(|e| *e != old);
                if table.len() == before {
                    return ResponseTemplate::new(400).set_body_string("rewrite not found");
                }
                ResponseTemplate::new(200)
            }
            ("PUT", "/control/rewrite/update") if self.supports_update => {
                self.mutations.fetch_add(1, Ordering::SeqCst);
                let (Some(target), Some(update)) = (entry(&body["target"]), entry(&body["update"]))
                else {
                    return ResponseTemplate::new(400).set_body_string("bad request");
                };
                match table.iter_mut().find(|e| **e == target) {
                    Some(slot) => {
                        *slot = update;
                        ResponseTemplate::new(200)
                    }
                    None => ResponseTemplate::new(400).set_body_string("rewrite not found"),
                }
            }
            _ => ResponseTemplate::new(404),
        }
    }
}
