//! In-memory stand-in for the curing backend, served through `HttpClient`

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use curing_dashboard::io::{HttpClient, HttpResponse};
use curing_dashboard::model::{Notification, Severity};
use curing_dashboard::DashboardError;
use tokio::sync::RwLock;

/// A request the fake received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Default)]
struct Store {
    /// Raw body per GET path; a missing path answers 404
    documents: HashMap<String, String>,
    notifications: Vec<Notification>,
    next_id: u64,
    requests: Vec<RecordedRequest>,
}

/// Backend double. Device and history payloads are canned; the notification
/// list is live and honours every mutation the dashboard sends.
#[derive(Debug, Default)]
pub struct FakeBackend {
    unreachable: AtomicBool,
    store: RwLock<Store>,
}

pub const BASE_URL: &str = "http://fake-backend";

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        {
            let mut store = backend.store.try_write().expect("fresh store is unlocked");
            store.next_id = 1;
            for (path, body) in [
                (
                    "/api/senzori/beton",
                    r#"{"temperatura": 22.5, "vlaznost": 65.0, "baterija": 85, "greska": null}"#,
                ),
                (
                    "/api/senzori/povrsina",
                    r#"{"temperatura": 20.1, "vlaznost": 58.7, "baterija": 92, "greska": null}"#,
                ),
                (
                    "/api/pumpa/stanje",
                    r#"{"aktivna": 0, "baterija": 78, "greska": null}"#,
                ),
                (
                    "/api/grijac/stanje",
                    r#"{"aktivan": 1, "temperatura": 30.0, "baterija": 65, "greska": null}"#,
                ),
                ("/api/sim-time", r#"{"date": "2025-05-05", "time": "12:00:00"}"#),
            ] {
                store.documents.insert(path.to_string(), body.to_string());
            }
        }
        backend
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub async fn set_document(&self, path: &str, body: &str) {
        self.store
            .write()
            .await
            .documents
            .insert(path.to_string(), body.to_string());
    }

    pub async fn remove_document(&self, path: &str) {
        self.store.write().await.documents.remove(path);
    }

    /// Add a notification at the head of the list, as the backend lists newest first
    pub async fn push_notification(&self, severity: Severity, message: &str) -> u64 {
        let mut store = self.store.write().await;
        let id = store.next_id;
        store.next_id += 1;
        store.notifications.insert(
            0,
            Notification {
                id,
                kind: "temperature".to_string(),
                severity,
                message: message.to_string(),
                timestamp: "2025-05-05 12:00:00".to_string(),
                acknowledged: false,
            },
        );
        id
    }

    pub async fn notification_ids(&self) -> Vec<u64> {
        self.store
            .read()
            .await
            .notifications
            .iter()
            .map(|n| n.id)
            .collect()
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.store.read().await.requests.clone()
    }

    fn path(url: &str) -> &str {
        url.strip_prefix(BASE_URL).unwrap_or(url)
    }

    async fn handle(
        &self,
        method: &str,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> curing_dashboard::Result<HttpResponse> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(DashboardError::Http(format!(
                "{} {} failed: connection refused",
                method, url
            )));
        }

        let path = Self::path(url).to_string();
        let mut store = self.store.write().await;
        store.requests.push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            body: body.cloned(),
        });

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let response = match (method, segments.as_slice()) {
            ("GET", ["api", "notifikacije"]) => ok(serde_json::to_string(&store.notifications)?),
            ("POST", ["api", "notifikacije", id, "acknowledge"]) => {
                match find(&mut store.notifications, id) {
                    Some(n) => {
                        n.acknowledged = true;
                        ok(r#"{"uspjeh": true}"#.to_string())
                    }
                    None => not_found(),
                }
            }
            ("POST", ["api", "notifikacije", "procitaj"]) => {
                let id = body.and_then(|b| b["id"].as_u64()).unwrap_or_default();
                match find(&mut store.notifications, &id.to_string()) {
                    Some(n) => {
                        n.acknowledged = true;
                        ok("{}".to_string())
                    }
                    None => not_found(),
                }
            }
            ("POST", ["api", "notifikacije", "procitaj-sve"]) => {
                store
                    .notifications
                    .iter_mut()
                    .for_each(|n| n.acknowledged = true);
                ok("{}".to_string())
            }
            ("DELETE", ["api", "notifikacije", "obrisi-procitane"]) => {
                store.notifications.retain(|n| !n.acknowledged);
                ok("{}".to_string())
            }
            ("DELETE", ["api", "notifikacije", "obrisi-sve"]) => {
                store.notifications.clear();
                ok("{}".to_string())
            }
            ("DELETE", ["api", "notifikacije", id]) => {
                let before = store.notifications.len();
                store.notifications.retain(|n| n.id.to_string() != *id);
                if store.notifications.len() < before {
                    ok("{}".to_string())
                } else {
                    not_found()
                }
            }
            ("POST", ["api", "pumpa", "upravljanje"]) => {
                let starting = body.map(|b| b["akcija"] == "pokreni").unwrap_or(false);
                let state = format!(
                    r#"{{"aktivna": {}, "baterija": 78, "greska": null, "preostalo_vrijeme": {}}}"#,
                    starting,
                    body.and_then(|b| b["trajanje"].as_u64()).unwrap_or(0)
                );
                store
                    .documents
                    .insert("/api/pumpa/stanje".to_string(), state);
                let message = if starting {
                    "Pumpa pokrenuta"
                } else {
                    "Pumpa zaustavljena"
                };
                ok(format!(r#"{{"uspjeh": true, "poruka": "{}"}}"#, message))
            }
            ("POST", ["api", "grijac", "upravljanje"]) => {
                ok(r#"{"uspjeh": true, "poruka": "Grijač ažuriran"}"#.to_string())
            }
            ("GET", _) => {
                let key = path.split('?').next().unwrap_or(&path);
                match store.documents.get(key) {
                    Some(body) => ok(body.clone()),
                    None => not_found(),
                }
            }
            _ => not_found(),
        };
        Ok(response)
    }
}

fn find<'a>(list: &'a mut [Notification], id: &str) -> Option<&'a mut Notification> {
    list.iter_mut().find(|n| n.id.to_string() == id)
}

fn ok(body: String) -> HttpResponse {
    HttpResponse { status: 200, body }
}

fn not_found() -> HttpResponse {
    HttpResponse {
        status: 404,
        body: r#"{"error": "not found"}"#.to_string(),
    }
}

#[async_trait::async_trait]
impl HttpClient for FakeBackend {
    async fn get(&self, url: &str) -> curing_dashboard::Result<HttpResponse> {
        self.handle("GET", url, None).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> curing_dashboard::Result<HttpResponse> {
        self.handle("POST", url, Some(body)).await
    }

    async fn delete(&self, url: &str) -> curing_dashboard::Result<HttpResponse> {
        self.handle("DELETE", url, None).await
    }
}
