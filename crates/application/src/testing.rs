//! Scripted transport for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use parking_lot::Mutex;
use quay_domain::{ApiRequest, ApiResponse};
use serde_json::json;

use crate::endpoints;
use crate::ports::{Transport, TransportError, TransportFuture};

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync;

/// Answers every request through a closure and records what was sent.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
    delays: Vec<(String, Duration)>,
}

impl ScriptedTransport {
    pub fn new(
        handler: impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            delays: Vec::new(),
        }
    }

    /// Holds responses for `path` back for `delay`.
    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.push((path.to_string(), delay));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.path == path).count()
    }

    /// The last request sent, if any.
    pub fn last(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> TransportFuture<'_> {
        self.requests.lock().push(request.clone());
        let result = (self.handler)(request);
        let delay = self
            .delays
            .iter()
            .find(|(path, _)| *path == request.path)
            .map(|(_, d)| *d);
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}

/// A server that rejects every token except `new_token`, issues it from the
/// refresh endpoint after a short delay, and echoes the path otherwise.
pub fn unauthorized_until_refreshed(new_token: &str, rotated: Option<&str>) -> ScriptedTransport {
    let new_token = new_token.to_string();
    let rotated = rotated.map(str::to_string);
    ScriptedTransport::new(move |request| {
        if request.path == endpoints::auth::REFRESH {
            let mut body = json!({"accessToken": new_token});
            if let Some(rotated) = &rotated {
                body["refreshToken"] = json!(rotated);
            }
            return Ok(ApiResponse::json(200, &body));
        }
        if request.bearer_token() == Some(new_token.as_str()) {
            Ok(ApiResponse::json(200, &json!({"path": request.path})))
        } else {
            Ok(ApiResponse::json(401, &json!({"message": "Token expired"})))
        }
    })
    .delay(endpoints::auth::REFRESH, Duration::from_millis(20))
}
