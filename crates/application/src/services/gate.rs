//! Gate-in and gate-out processing.

use std::sync::Arc;

use quay_domain::{
    ApiRequest, GateOperation, GateOperationFilter, GateOperationInput, Page, PageRequest, Validate,
};
use tracing::info;

use super::fetch_page;
use crate::client::ApiClient;
use crate::endpoints::{self, GATE_OPERATIONS};
use crate::error::ApiResult;

/// Gate operation endpoints.
#[derive(Debug, Clone)]
pub struct GateOperationService {
    client: Arc<ApiClient>,
}

impl GateOperationService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lists gate operations.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn list(
        &self,
        filter: &GateOperationFilter,
        page: PageRequest,
    ) -> ApiResult<Page<GateOperation>> {
        fetch_page(&self.client, GATE_OPERATIONS, filter, page).await
    }

    /// Fetches one gate operation.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn get(&self, id: &str) -> ApiResult<GateOperation> {
        self.client
            .execute(ApiRequest::get(endpoints::item(GATE_OPERATIONS, id)?))
            .await
    }

    /// Records a container entering the terminal.
    ///
    /// # Errors
    /// Fails on invalid input, or when the server refuses the movement
    /// (blacklisted vehicle, container already in yard).
    pub async fn gate_in(&self, input: &GateOperationInput) -> ApiResult<GateOperation> {
        self.record("gate-in", input).await
    }

    /// Records a container leaving the terminal.
    ///
    /// # Errors
    /// As [`GateOperationService::gate_in`].
    pub async fn gate_out(&self, input: &GateOperationInput) -> ApiResult<GateOperation> {
        self.record("gate-out", input).await
    }

    /// Corrects a recorded operation.
    ///
    /// # Errors
    /// Fails on invalid input or an unknown id.
    pub async fn update(&self, id: &str, input: &GateOperationInput) -> ApiResult<GateOperation> {
        let input = normalized(input);
        input.validate()?;
        self.client
            .execute(ApiRequest::put(endpoints::item(GATE_OPERATIONS, id)?).with_json(&input)?)
            .await
    }

    /// Cancels a pending operation.
    ///
    /// # Errors
    /// Fails on an unknown id or an operation that already completed.
    pub async fn cancel(&self, id: &str) -> ApiResult<GateOperation> {
        self.client
            .execute(ApiRequest::patch(endpoints::item_action(
                GATE_OPERATIONS,
                id,
                "cancel",
            )?))
            .await
    }

    async fn record(&self, direction: &str, input: &GateOperationInput) -> ApiResult<GateOperation> {
        let input = normalized(input);
        input.validate()?;
        let operation: GateOperation = self
            .client
            .execute(
                ApiRequest::post(format!("{GATE_OPERATIONS}/{direction}")).with_json(&input)?,
            )
            .await?;
        info!(
            id = %operation.id,
            container = %operation.container_number,
            direction,
            "gate operation recorded"
        );
        Ok(operation)
    }
}

fn normalized(input: &GateOperationInput) -> GateOperationInput {
    GateOperationInput {
        container_number: input.container_number.trim().to_ascii_uppercase(),
        vehicle_number: input.vehicle_number.trim().to_ascii_uppercase(),
        ..input.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;
    use crate::testing::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use quay_domain::{ApiResponse, GateOperationType, GateStatus, HttpMethod};
    use serde_json::json;

    fn service(transport: &Arc<ScriptedTransport>) -> GateOperationService {
        GateOperationService::new(Arc::new(ApiClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::new()),
        )))
    }

    fn operation_json(kind: &str, status: &str) -> serde_json::Value {
        json!({
            "id": "g1",
            "operationType": kind,
            "containerNumber": "MSCU1234567",
            "vehicleNumber": "TRK-001",
            "status": status,
            "timestamp": "2026-03-01T08:00:00Z"
        })
    }

    #[tokio::test]
    async fn gate_in_posts_normalized_input() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(ApiResponse::json(201, &operation_json("GATE_IN", "COMPLETED")))
        }));

        let op = service(&transport)
            .gate_in(&GateOperationInput {
                container_number: "mscu1234567".to_string(),
                vehicle_number: "trk-001".to_string(),
                driver_name: None,
                seal_number: None,
                yard_block: Some("A1".to_string()),
                remarks: None,
            })
            .await
            .unwrap();

        assert_eq!(op.operation_type, GateOperationType::GateIn);
        let sent = transport.last().unwrap();
        assert_eq!(sent.path, "/v1/gate-operations/gate-in");
        assert_eq!(sent.method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn cancel_patches_operation() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(ApiResponse::json(200, &operation_json("GATE_OUT", "CANCELLED")))
        }));

        let op = service(&transport).cancel("g1").await.unwrap();

        assert_eq!(op.status, GateStatus::Cancelled);
        let sent = transport.last().unwrap();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.path, "/v1/gate-operations/g1/cancel");
    }
}
