//! An in-process Eureka registry.
//!
//! It implements the subset of the Eureka REST API the registry client uses,
//! keeps the registered instances in memory and records every request. It
//! can also be told to reject registrations or to answer queries with
//! malformed json.
use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Bytes;
use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

/// One request received by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub accept: Option<String>,
}

#[derive(Debug, Default)]
struct Registry {
    /// Instances by application name, then by instance key.
    applications: BTreeMap<String, BTreeMap<String, Value>>,
    requests: Vec<RecordedRequest>,
    rejected_registrations: usize,
    malformed_queries: bool,
}

type Shared = Arc<Mutex<Registry>>;

/// A running fake registry. It stops when [`FakeRegistry::stop`] is called.
#[derive(Debug)]
pub struct FakeRegistry {
    local_addr: SocketAddr,
    registry: Shared,
    halt: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl FakeRegistry {
    /// Starts the registry on an ephemeral port of the loopback interface.
    ///
    /// # Panics
    ///
    /// Will panic if the socket can not be bound.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("it should bind the fake registry");
        let local_addr = listener.local_addr().expect("it should get the fake registry address");

        let registry = Shared::default();
        let (halt, rx_halt) = oneshot::channel::<()>();

        let router = router(registry.clone());

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = rx_halt.await;
                })
                .await
                .expect("the fake registry should run");
        });

        Self {
            local_addr,
            registry,
            halt,
            task,
        }
    }

    /// # Panics
    ///
    /// Will panic if the address is not a valid url.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.local_addr)).expect("it should be a valid url")
    }

    /// The next `count` registrations are answered with `500 Internal Server Error`.
    pub fn reject_next_registrations(&self, count: usize) {
        self.lock().rejected_registrations = count;
    }

    /// Queries are answered with a body that is not json.
    pub fn serve_malformed_json(&self, enabled: bool) {
        self.lock().malformed_queries = enabled;
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// The requests received so far with the given method.
    #[must_use]
    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|request| request.method == method).collect()
    }

    /// The keys (`{ip}:{app}:{instance id}`) of the instances of an application.
    #[must_use]
    pub fn instance_keys(&self, app_name: &str) -> Vec<String> {
        self.lock()
            .applications
            .get(app_name)
            .map(|instances| instances.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Registers an instance without going through the http api.
    ///
    /// # Panics
    ///
    /// Will panic if the instance has no `ipAddr` or `metadata.instanceId`.
    pub fn insert(&self, app_name: &str, instance: Value) {
        let key = instance_key(&instance).expect("the instance should have an address and an instance id");

        self.lock()
            .applications
            .entry(app_name.to_string())
            .or_default()
            .insert(key, instance);
    }

    /// # Panics
    ///
    /// Will panic if the server task failed.
    pub async fn stop(self) {
        let _ = self.halt.send(());
        self.task.await.expect("the fake registry should stop cleanly");
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().expect("the fake registry lock should not be poisoned")
    }
}

fn router(registry: Shared) -> Router {
    Router::new()
        .route("/eureka/apps", get(applications))
        .route("/eureka/apps/{app}", get(application).post(register))
        .route("/eureka/apps/{app}/{instance_key}", axum::routing::put(heartbeat).delete(deregister))
        .layer(middleware::from_fn_with_state(registry.clone(), record))
        .with_state(registry)
}

async fn record(State(registry): State<Shared>, request: Request, next: Next) -> Response {
    let recorded = {
        let header = |name: HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(ToString::to_string)
        };

        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            content_type: header(CONTENT_TYPE),
            accept: header(ACCEPT),
        }
    };

    registry.lock().expect("lock").requests.push(recorded);

    next.run(request).await
}

async fn register(State(registry): State<Shared>, Path(app): Path<String>, body: Bytes) -> StatusCode {
    let mut registry = registry.lock().expect("lock");

    if registry.rejected_registrations > 0 {
        registry.rejected_registrations -= 1;
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    let Ok(mut document) = serde_json::from_slice::<Value>(&body) else {
        return StatusCode::BAD_REQUEST;
    };

    let instance = document["instance"].take();

    let Some(key) = instance_key(&instance) else {
        return StatusCode::BAD_REQUEST;
    };

    registry.applications.entry(app).or_default().insert(key, instance);

    StatusCode::NO_CONTENT
}

async fn application(State(registry): State<Shared>, Path(app): Path<String>) -> Response {
    let registry = registry.lock().expect("lock");

    if registry.malformed_queries {
        return malformed();
    }

    match registry.applications.get(&app) {
        Some(instances) if !instances.is_empty() => json_response(&json!({ "application": application_json(&app, instances) })),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn applications(State(registry): State<Shared>) -> Response {
    let registry = registry.lock().expect("lock");

    if registry.malformed_queries {
        return malformed();
    }

    let application: Vec<Value> = registry
        .applications
        .iter()
        .filter(|(_, instances)| !instances.is_empty())
        .map(|(app, instances)| application_json(app, instances))
        .collect();

    json_response(&json!({ "applications": { "versions__delta": "1", "apps__hashcode": "", "application": application } }))
}

async fn heartbeat(State(registry): State<Shared>, Path((app, instance_key)): Path<(String, String)>) -> StatusCode {
    let registry = registry.lock().expect("lock");

    match registry.applications.get(&app) {
        Some(instances) if instances.contains_key(&instance_key) => StatusCode::OK,
        _ => StatusCode::NOT_FOUND,
    }
}

async fn deregister(State(registry): State<Shared>, Path((app, instance_key)): Path<(String, String)>) -> StatusCode {
    let mut registry = registry.lock().expect("lock");

    match registry.applications.get_mut(&app).and_then(|instances| instances.remove(&instance_key)) {
        Some(_) => StatusCode::OK,
        None => StatusCode::NOT_FOUND,
    }
}

fn instance_key(instance: &Value) -> Option<String> {
    let ip_address = instance["ipAddr"].as_str()?;
    let instance_id = instance["metadata"]["instanceId"].as_str()?;

    Some(format!("{ip_address}:{instance_id}"))
}

fn application_json(app: &str, instances: &BTreeMap<String, Value>) -> Value {
    json!({ "name": app, "instance": instances.values().collect::<Vec<_>>() })
}

fn json_response(body: &Value) -> Response {
    ([(CONTENT_TYPE, "application/json")], body.to_string()).into_response()
}

fn malformed() -> Response {
    ([(CONTENT_TYPE, "application/json")], "{\"application\": ").into_response()
}
