//! Token refresh behaviour across the full stack: services, dispatcher,
//! coordinator and the session file.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use quay_application::endpoints::{self, auth};
use quay_application::{ApiError, CredentialStore, MemoryCredentialStore};
use quay_domain::{ApiResponse, ContainerFilter, LoginRequest, PageRequest, RequestBody, VehicleFilter};
use quay_infrastructure::FileCredentialStore;
use tempfile::TempDir;

use common::{FixedClock, MockApi, stale_session};
use quay::Quay;

async fn stack(api: &Arc<MockApi>, store: Arc<dyn CredentialStore>) -> Quay {
    Quay::with_ports(api.clone(), store, Arc::new(FixedClock::march_tenth()))
        .await
        .unwrap()
}

async fn file_store(dir: &TempDir) -> Arc<FileCredentialStore> {
    let store = Arc::new(FileCredentialStore::new(dir.path().join("session.json")));
    store.save(&stale_session()).await.unwrap();
    store
}

#[tokio::test]
async fn three_resources_share_one_refresh() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;
    let api = Arc::new(MockApi::expiring("new-token"));
    let quay = stack(&api, store.clone()).await;

    let (container_filter, vehicle_filter) = (ContainerFilter::default(), VehicleFilter::default());
    let (containers, vehicles, yard) = (quay.containers(), quay.vehicles(), quay.yard());
    let (c, v, y) = tokio::join!(
        containers.list(&container_filter, PageRequest::default()),
        vehicles.list(&vehicle_filter, PageRequest::default()),
        yard.list(PageRequest::default()),
    );

    assert_eq!(c.unwrap().items[0].container_number, "MSCU1234567");
    assert_eq!(v.unwrap().items[0].vehicle_number, "TRK-001");
    assert_eq!(y.unwrap().items[0].name, "A1");
    assert_eq!(api.count(auth::REFRESH), 1);

    for path in [endpoints::CONTAINERS, endpoints::VEHICLES, endpoints::YARD_BLOCKS] {
        let tokens: Vec<_> = api
            .requests_to(path)
            .iter()
            .map(|r| r.bearer_token().map(str::to_string))
            .collect();
        assert_eq!(
            tokens,
            vec![Some("stale-token".to_string()), Some("new-token".to_string())],
            "{path}"
        );
    }

    let saved = store.load().await.unwrap();
    assert_eq!(saved.access_token.as_deref(), Some("new-token"));
    assert_eq!(saved.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn refresh_sends_the_stored_refresh_token() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(MockApi::expiring("new-token"));
    let quay = stack(&api, file_store(&dir).await).await;

    quay.yard().list(PageRequest::default()).await.unwrap();

    let refresh = api.requests_to(auth::REFRESH);
    assert_eq!(
        refresh[0].body,
        RequestBody::Json(serde_json::json!({ "refreshToken": "refresh-1" }))
    );
}

#[tokio::test]
async fn failed_refresh_rejects_every_caller_and_clears_once() {
    let store = Arc::new(MemoryCredentialStore::with_session(stale_session()));
    let api = Arc::new(MockApi::revoked());
    let quay = stack(&api, store.clone()).await;

    let (container_filter, vehicle_filter) = (ContainerFilter::default(), VehicleFilter::default());
    let (containers, vehicles, yard) = (quay.containers(), quay.vehicles(), quay.yard());
    let (c, v, y) = tokio::join!(
        containers.list(&container_filter, PageRequest::default()),
        vehicles.list(&vehicle_filter, PageRequest::default()),
        yard.list(PageRequest::default()),
    );

    for result in [c.map(|_| ()), v.map(|_| ()), y.map(|_| ())] {
        let error = result.unwrap_err();
        assert!(error.requires_login(), "{error:?}");
        assert_eq!(error.to_string(), "session expired: Refresh token expired");
    }
    assert_eq!(api.count(auth::REFRESH), 1);
    assert_eq!(store.clear_count(), 1);
    assert!(!store.snapshot().await.is_authenticated());
}

#[tokio::test]
async fn failed_refresh_removes_the_session_file() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir).await;
    let api = Arc::new(MockApi::revoked());
    let quay = stack(&api, store.clone()).await;

    let result = quay.yard().list(PageRequest::default()).await;

    assert!(matches!(result, Err(ApiError::RefreshFailed(_))));
    assert!(!store.path().exists());
}

#[tokio::test]
async fn second_401_does_not_refresh_again() {
    let store = Arc::new(MemoryCredentialStore::with_session(stale_session()));
    let api = Arc::new(MockApi::new(|request| {
        if request.path == auth::REFRESH {
            ApiResponse::json(200, &serde_json::json!({ "accessToken": "new-token" }))
        } else {
            common::unauthorized("Token revoked")
        }
    }));
    let quay = stack(&api, store).await;

    let result = quay.containers().get("c1").await;

    match result {
        Err(ApiError::Http { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Token revoked");
        }
        other => panic!("expected a final 401, got {other:?}"),
    }
    assert_eq!(api.count(auth::REFRESH), 1);
    assert_eq!(api.count("/v1/containers/c1"), 2);
}

#[tokio::test]
async fn login_failure_never_triggers_refresh() {
    let store = Arc::new(MemoryCredentialStore::with_session(stale_session()));
    let api = Arc::new(MockApi::new(|_| common::unauthorized("Invalid email or password")));
    let quay = stack(&api, store.clone()).await;

    let result = quay
        .auth()
        .login(&LoginRequest {
            email: "ana@quay.io".to_string(),
            password: "wrong-password".to_string(),
        })
        .await;

    match result {
        Err(ApiError::Authentication { message }) => {
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("expected an authentication error, got {other:?}"),
    }
    assert_eq!(api.count(auth::REFRESH), 0);
    assert_eq!(store.clear_count(), 0);
}

#[tokio::test]
async fn a_request_after_settlement_starts_a_new_cycle() {
    let store = Arc::new(MemoryCredentialStore::with_session(stale_session()));
    let api = Arc::new(MockApi::expiring("new-token"));
    let quay = stack(&api, store.clone()).await;

    quay.yard().list(PageRequest::default()).await.unwrap();
    quay.client().set_access_token(Some("stale-again".to_string()));
    quay.yard().list(PageRequest::default()).await.unwrap();

    assert_eq!(api.count(auth::REFRESH), 2);
}
