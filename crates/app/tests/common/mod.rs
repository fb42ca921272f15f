//! In-memory API server and fixed clock shared by the integration tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use quay_application::endpoints::{self, auth};
use quay_application::{Clock, Transport, TransportError, TransportFuture};
use quay_domain::{ApiRequest, ApiResponse, HttpMethod, Session};
use serde_json::{Value, json};

type Handler = dyn Fn(&ApiRequest) -> ApiResponse + Send + Sync;

/// Answers requests through a closure, records them, and holds refresh
/// responses back briefly so concurrent callers pile up behind it.
pub struct MockApi {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockApi {
    pub fn new(handler: impl Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Rejects every token but `fresh`, which the refresh endpoint issues.
    pub fn expiring(fresh: &'static str) -> Self {
        Self::new(move |request| {
            if request.path == auth::REFRESH {
                return ApiResponse::json(200, &json!({ "accessToken": fresh }));
            }
            if request.bearer_token() == Some(fresh) {
                ApiResponse::json(200, &fixture(&request.path))
            } else {
                unauthorized("Token expired")
            }
        })
    }

    /// Every resource call is 401 and the refresh token is rejected too.
    pub fn revoked() -> Self {
        Self::new(|request| {
            if request.path == auth::REFRESH {
                unauthorized("Refresh token expired")
            } else {
                unauthorized("Token expired")
            }
        })
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
        self.requests_to(path).len()
    }

    pub fn methods_to(&self, path: &str) -> Vec<HttpMethod> {
        self.requests_to(path).iter().map(|r| r.method).collect()
    }
}

impl Transport for MockApi {
    fn send(&self, request: &ApiRequest) -> TransportFuture<'_> {
        self.requests.lock().push(request.clone());
        let response = (self.handler)(request);
        let slow = request.path == auth::REFRESH;
        Box::pin(async move {
            if slow {
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            Ok::<_, TransportError>(response)
        })
    }
}

pub fn unauthorized(message: &str) -> ApiResponse {
    ApiResponse::json(401, &json!({ "message": message }))
}

/// A list body for each collection path.
pub fn fixture(path: &str) -> Value {
    match path {
        endpoints::CONTAINERS => json!([container_json()]),
        endpoints::VEHICLES => json!({ "data": [{
            "id": "v1",
            "vehicleNumber": "TRK-001",
            "vehicleType": "TRUCK",
            "blacklisted": false
        }]}),
        endpoints::YARD_BLOCKS => json!({
            "items": [{ "id": "y1", "name": "A1", "capacity": 100, "occupied": 40 }],
            "total": 1,
            "page": 1,
            "pageSize": 10
        }),
        other => json!({ "path": other }),
    }
}

pub fn container_json() -> Value {
    json!({
        "id": "c1",
        "containerNumber": "MSCU1234567",
        "size": "40FT",
        "containerType": "REEFER",
        "status": "IN_YARD",
        "yardBlock": "A1",
        "arrivalDate": "2024-03-07T08:00:00Z"
    })
}

pub fn operator_json() -> Value {
    json!({
        "id": "u1",
        "name": "Ana Operator",
        "email": "ana@quay.io",
        "role": "operator"
    })
}

pub fn stale_session() -> Session {
    Session {
        access_token: Some("stale-token".to_string()),
        refresh_token: Some("refresh-1".to_string()),
        user: None,
    }
}

/// Always answers the same instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn march_tenth() -> Self {
        Self(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
