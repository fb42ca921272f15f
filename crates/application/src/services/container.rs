//! Container inventory.

use std::sync::Arc;

use quay_domain::{
    ApiRequest, Container, ContainerFilter, ContainerInput, Page, PageRequest, QueryParams,
    Validate,
};

use super::fetch_page;
use crate::client::ApiClient;
use crate::endpoints::{self, CONTAINERS};
use crate::error::ApiResult;

/// Container endpoints.
#[derive(Debug, Clone)]
pub struct ContainerService {
    client: Arc<ApiClient>,
}

impl ContainerService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lists containers matching `filter`.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn list(&self, filter: &ContainerFilter, page: PageRequest) -> ApiResult<Page<Container>> {
        fetch_page(&self.client, CONTAINERS, filter, page).await
    }

    /// Fetches one container.
    ///
    /// # Errors
    /// `Http { status: 404, .. }` when it does not exist.
    pub async fn get(&self, id: &str) -> ApiResult<Container> {
        self.client
            .execute(ApiRequest::get(endpoints::item(CONTAINERS, id)?))
            .await
    }

    /// Registers a container.
    ///
    /// # Errors
    /// Fails on invalid input or a duplicate container number.
    pub async fn create(&self, input: &ContainerInput) -> ApiResult<Container> {
        let input = normalized(input);
        input.validate()?;
        self.client
            .execute(ApiRequest::post(CONTAINERS).with_json(&input)?)
            .await
    }

    /// Replaces a container's details.
    ///
    /// # Errors
    /// Fails on invalid input or an unknown id.
    pub async fn update(&self, id: &str, input: &ContainerInput) -> ApiResult<Container> {
        let input = normalized(input);
        input.validate()?;
        self.client
            .execute(ApiRequest::put(endpoints::item(CONTAINERS, id)?).with_json(&input)?)
            .await
    }

    /// Removes a container.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .execute_empty(ApiRequest::delete(endpoints::item(CONTAINERS, id)?))
            .await
    }

    /// Looks a container up by its ISO 6346 number.
    ///
    /// # Errors
    /// `Http { status: 404, .. }` when no container carries the number.
    pub async fn search(&self, container_number: &str) -> ApiResult<Container> {
        let query = QueryParams::new().with("containerNumber", normalize_number(container_number));
        self.client
            .execute(ApiRequest::get(format!("{CONTAINERS}/search")).with_query(query))
            .await
    }
}

fn normalize_number(number: &str) -> String {
    number.trim().to_ascii_uppercase()
}

fn normalized(input: &ContainerInput) -> ContainerInput {
    ContainerInput {
        container_number: normalize_number(&input.container_number),
        ..input.clone()
    }
}
