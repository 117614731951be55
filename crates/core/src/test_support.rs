//! In-memory gateway used by the unit tests of this crate.

use crate::gateway::{ApiRequest, Method, Transport};
use crate::{ClinicError, ClinicResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone, Debug)]
pub(crate) enum Reply {
    Json(Value),
    Status(u16, Option<String>),
    Network,
}

impl Reply {
    pub(crate) fn json(value: Value) -> Self {
        Reply::Json(value)
    }

    pub(crate) fn status(status: u16, message: &str) -> Self {
        Reply::Status(status, Some(message.to_string()))
    }

    pub(crate) fn message(message: &str) -> Self {
        Reply::Json(json!({ "message": message }))
    }
}

/// Answers each `(method, path)` with a canned reply and records every request.
///
/// Unrouted requests get a 404.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(self, method: Method, path: &str, reply: Reply) -> Self {
        self.set(method, path, reply);
        self
    }

    /// Replace the reply for a route after construction.
    pub(crate) fn set(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> ClinicResult<Value> {
        let reply = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, request.path.clone()))
            .cloned()
            .unwrap_or(Reply::Status(404, None));
        self.requests.lock().unwrap().push(request);

        match reply {
            Reply::Json(value) => Ok(value),
            Reply::Status(status, message) => Err(ClinicError::Http { status, message }),
            Reply::Network => Err(ClinicError::Transport("connection refused".into())),
        }
    }
}
