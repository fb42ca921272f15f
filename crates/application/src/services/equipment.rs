//! Handling equipment fleet.

use std::sync::Arc;

use quay_domain::{
    ApiRequest, Equipment, EquipmentInput, EquipmentStatus, EquipmentStatusUpdate, Page,
    PageRequest, Validate,
};

use super::{Unfiltered, fetch_page};
use crate::client::ApiClient;
use crate::endpoints::{self, EQUIPMENT};
use crate::error::ApiResult;

/// Equipment endpoints.
#[derive(Debug, Clone)]
pub struct EquipmentService {
    client: Arc<ApiClient>,
}

impl EquipmentService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lists equipment.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn list(&self, page: PageRequest) -> ApiResult<Page<Equipment>> {
        fetch_page(&self.client, EQUIPMENT, &Unfiltered, page).await
    }

    /// Fetches one piece of equipment.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn get(&self, id: &str) -> ApiResult<Equipment> {
        self.client
            .execute(ApiRequest::get(endpoints::item(EQUIPMENT, id)?))
            .await
    }

    /// Adds equipment to the fleet.
    ///
    /// # Errors
    /// Fails on invalid input.
    pub async fn create(&self, input: &EquipmentInput) -> ApiResult<Equipment> {
        input.validate()?;
        self.client
            .execute(ApiRequest::post(EQUIPMENT).with_json(input)?)
            .await
    }

    /// Replaces equipment details.
    ///
    /// # Errors
    /// Fails on invalid input or an unknown id.
    pub async fn update(&self, id: &str, input: &EquipmentInput) -> ApiResult<Equipment> {
        input.validate()?;
        self.client
            .execute(ApiRequest::put(endpoints::item(EQUIPMENT, id)?).with_json(input)?)
            .await
    }

    /// Removes equipment.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .execute_empty(ApiRequest::delete(endpoints::item(EQUIPMENT, id)?))
            .await
    }

    /// Changes the operational status.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn set_status(&self, id: &str, status: EquipmentStatus) -> ApiResult<Equipment> {
        self.client
            .execute(
                ApiRequest::patch(endpoints::item_action(EQUIPMENT, id, "status")?)
                    .with_json(&EquipmentStatusUpdate { status })?,
            )
            .await
    }
}
