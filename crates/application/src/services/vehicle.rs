//! Vehicle registry and blacklist.

use std::sync::Arc;

use quay_domain::{
    ApiRequest, BlacklistUpdate, Page, PageRequest, Validate, Vehicle, VehicleFilter, VehicleInput,
};
use tracing::info;

use super::fetch_page;
use crate::client::ApiClient;
use crate::endpoints::{self, VEHICLES};
use crate::error::ApiResult;

/// Vehicle endpoints.
#[derive(Debug, Clone)]
pub struct VehicleService {
    client: Arc<ApiClient>,
}

impl VehicleService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lists vehicles.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn list(&self, filter: &VehicleFilter, page: PageRequest) -> ApiResult<Page<Vehicle>> {
        fetch_page(&self.client, VEHICLES, filter, page).await
    }

    /// Fetches one vehicle.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn get(&self, id: &str) -> ApiResult<Vehicle> {
        self.client
            .execute(ApiRequest::get(endpoints::item(VEHICLES, id)?))
            .await
    }

    /// Registers a vehicle.
    ///
    /// # Errors
    /// Fails on invalid input or a duplicate registration.
    pub async fn create(&self, input: &VehicleInput) -> ApiResult<Vehicle> {
        let input = normalized(input);
        input.validate()?;
        self.client
            .execute(ApiRequest::post(VEHICLES).with_json(&input)?)
            .await
    }

    /// Replaces a vehicle's details.
    ///
    /// # Errors
    /// Fails on invalid input or an unknown id.
    pub async fn update(&self, id: &str, input: &VehicleInput) -> ApiResult<Vehicle> {
        let input = normalized(input);
        input.validate()?;
        self.client
            .execute(ApiRequest::put(endpoints::item(VEHICLES, id)?).with_json(&input)?)
            .await
    }

    /// Removes a vehicle.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .execute_empty(ApiRequest::delete(endpoints::item(VEHICLES, id)?))
            .await
    }

    /// Blacklists or clears a vehicle. The reason is only sent when
    /// blacklisting.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn set_blacklisted(
        &self,
        id: &str,
        blacklisted: bool,
        reason: Option<String>,
    ) -> ApiResult<Vehicle> {
        let update = BlacklistUpdate {
            blacklisted,
            reason: reason.filter(|r| blacklisted && !r.trim().is_empty()),
        };
        let vehicle: Vehicle = self
            .client
            .execute(
                ApiRequest::patch(endpoints::item_action(VEHICLES, id, "blacklist")?)
                    .with_json(&update)?,
            )
            .await?;
        info!(vehicle = %vehicle.vehicle_number, blacklisted, "vehicle blacklist updated");
        Ok(vehicle)
    }
}

fn normalized(input: &VehicleInput) -> VehicleInput {
    VehicleInput {
        vehicle_number: input.vehicle_number.trim().to_ascii_uppercase(),
        ..input.clone()
    }
}
