//! Yard blocks and their occupancy.

use std::sync::Arc;

use quay_domain::{
    ApiRequest, Container, ContainerFilter, Page, PageRequest, Validate, YardBlock, YardBlockInput,
};

use super::{Unfiltered, fetch_page};
use crate::client::ApiClient;
use crate::endpoints::{self, YARD_BLOCKS};
use crate::error::ApiResult;

/// Yard block endpoints.
#[derive(Debug, Clone)]
pub struct YardService {
    client: Arc<ApiClient>,
}

impl YardService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lists yard blocks.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn list(&self, page: PageRequest) -> ApiResult<Page<YardBlock>> {
        fetch_page(&self.client, YARD_BLOCKS, &Unfiltered, page).await
    }

    /// Fetches one block.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn get(&self, id: &str) -> ApiResult<YardBlock> {
        self.client
            .execute(ApiRequest::get(endpoints::item(YARD_BLOCKS, id)?))
            .await
    }

    /// Creates a block.
    ///
    /// # Errors
    /// Fails on invalid input or a duplicate name.
    pub async fn create(&self, input: &YardBlockInput) -> ApiResult<YardBlock> {
        input.validate()?;
        self.client
            .execute(ApiRequest::post(YARD_BLOCKS).with_json(input)?)
            .await
    }

    /// Replaces a block's details.
    ///
    /// # Errors
    /// Fails on invalid input or an unknown id.
    pub async fn update(&self, id: &str, input: &YardBlockInput) -> ApiResult<YardBlock> {
        input.validate()?;
        self.client
            .execute(ApiRequest::put(endpoints::item(YARD_BLOCKS, id)?).with_json(input)?)
            .await
    }

    /// Removes a block.
    ///
    /// # Errors
    /// Fails on an unknown id or a block that still holds containers.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .execute_empty(ApiRequest::delete(endpoints::item(YARD_BLOCKS, id)?))
            .await
    }

    /// Containers stored in a block.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn containers_in_block(
        &self,
        id: &str,
        filter: &ContainerFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Container>> {
        let path = endpoints::item_action(YARD_BLOCKS, id, "containers")?;
        fetch_page(&self.client, &path, filter, page).await
    }
}
