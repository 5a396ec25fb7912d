//! Shared fixtures: a scripted catalog transport and a recording alert platform.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use dex_catalog::{Alert, AlertError, AlertHandle, AlertPlatform, Permission, Transport, TransportError};

pub const BASE: &str = "http://catalog.test";

pub fn list_url(limit: usize) -> String {
    format!("{}/pokemon?limit={}", BASE, limit)
}

pub fn detail_url(key: impl std::fmt::Display) -> String {
    format!("{}/pokemon/{}", BASE, key)
}

#[derive(Clone, Debug)]
pub enum Reply {
    Body(String),
    Status(u16),
}

#[derive(Clone)]
struct Route {
    reply: Reply,
    delay: Duration,
}

/// Serves canned replies per URL and counts every request.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Route>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: impl Into<String>, reply: Reply) {
        self.route_delayed(url, reply, Duration::ZERO);
    }

    pub fn route_delayed(&self, url: impl Into<String>, reply: Reply, delay: Duration) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), Route { reply, delay });
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
        let route = self.routes.lock().unwrap().get(url).cloned();
        let Some(route) = route else {
            return Err(TransportError::Status {
                status: 404,
                url: url.to_string(),
            });
        };
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        match route.reply {
            Reply::Body(body) => Ok(body.into_bytes()),
            Reply::Status(status) => Err(TransportError::Status {
                status,
                url: url.to_string(),
            }),
        }
    }
}

pub fn listing_body(entries: &[(&str, u32)]) -> Reply {
    let results: Vec<_> = entries
        .iter()
        .map(|(name, id)| json!({ "name": name, "url": format!("https://pokeapi.co/api/v2/pokemon/{}/", id) }))
        .collect();
    Reply::Body(
        json!({ "count": 1302, "next": null, "previous": null, "results": results }).to_string(),
    )
}

pub fn detail_body(id: u32, name: &str) -> Reply {
    Reply::Body(
        json!({
            "id": id,
            "name": name,
            "height": 7,
            "weight": 69,
            "base_experience": 64,
            "sprites": {
                "front_default": format!("https://img.test/sprite/{}.png", id),
                "other": { "official-artwork": { "front_default": format!("https://img.test/art/{}.png", id) } }
            },
            "types": [ { "slot": 1, "type": { "name": "grass", "url": "" } } ],
            "stats": [
                { "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "" } },
                { "base_stat": 49, "effort": 0, "stat": { "name": "attack", "url": "" } },
                { "base_stat": 49, "effort": 0, "stat": { "name": "defense", "url": "" } },
                { "base_stat": 65, "effort": 1, "stat": { "name": "special-attack", "url": "" } },
                { "base_stat": 65, "effort": 0, "stat": { "name": "special-defense", "url": "" } },
                { "base_stat": 45, "effort": 0, "stat": { "name": "speed", "url": "" } }
            ]
        })
        .to_string(),
    )
}

/// Alert platform that records what the notifier does with it.
pub struct RecordingPlatform {
    permission: Mutex<Permission>,
    answer: Permission,
    pub fail_show: bool,
    pub fail_dismiss: bool,
    requests: AtomicUsize,
    next: AtomicU64,
    shown: Mutex<Vec<(AlertHandle, Alert)>>,
    dismissed: Mutex<Vec<AlertHandle>>,
}

impl RecordingPlatform {
    /// `answer` is what a permission prompt resolves to.
    pub fn new(permission: Permission, answer: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
            answer,
            fail_show: false,
            fail_dismiss: false,
            requests: AtomicUsize::new(0),
            next: AtomicU64::new(1),
            shown: Mutex::new(Vec::new()),
            dismissed: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn shown(&self) -> Vec<(AlertHandle, Alert)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn dismissed(&self) -> Vec<AlertHandle> {
        self.dismissed.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertPlatform for RecordingPlatform {
    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> Permission {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.permission.lock().unwrap() = self.answer;
        self.answer
    }

    fn show(&self, alert: &Alert) -> Result<AlertHandle, AlertError> {
        if self.fail_show {
            return Err(AlertError::Rejected("platform refused".into()));
        }
        let handle = AlertHandle(self.next.fetch_add(1, Ordering::SeqCst));
        self.shown.lock().unwrap().push((handle, alert.clone()));
        Ok(handle)
    }

    fn dismiss(&self, handle: AlertHandle) -> Result<(), AlertError> {
        if self.fail_dismiss {
            return Err(AlertError::UnknownHandle(handle.0));
        }
        self.dismissed.lock().unwrap().push(handle);
        Ok(())
    }
}
