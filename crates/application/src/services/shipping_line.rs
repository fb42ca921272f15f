//! Shipping line master data.

use std::sync::Arc;

use quay_domain::{ApiRequest, Page, PageRequest, ShippingLine, ShippingLineInput, Validate};

use super::{Unfiltered, fetch_page};
use crate::client::ApiClient;
use crate::endpoints::{self, SHIPPING_LINES};
use crate::error::ApiResult;

/// Shipping line endpoints.
#[derive(Debug, Clone)]
pub struct ShippingLineService {
    client: Arc<ApiClient>,
}

impl ShippingLineService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lists shipping lines.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn list(&self, page: PageRequest) -> ApiResult<Page<ShippingLine>> {
        fetch_page(&self.client, SHIPPING_LINES, &Unfiltered, page).await
    }

    /// Fetches one shipping line.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn get(&self, id: &str) -> ApiResult<ShippingLine> {
        self.client
            .execute(ApiRequest::get(endpoints::item(SHIPPING_LINES, id)?))
            .await
    }

    /// Adds a shipping line.
    ///
    /// # Errors
    /// Fails on invalid input or a duplicate code.
    pub async fn create(&self, input: &ShippingLineInput) -> ApiResult<ShippingLine> {
        let input = normalized(input);
        input.validate()?;
        self.client
            .execute(ApiRequest::post(SHIPPING_LINES).with_json(&input)?)
            .await
    }

    /// Replaces a shipping line's details.
    ///
    /// # Errors
    /// Fails on invalid input or an unknown id.
    pub async fn update(&self, id: &str, input: &ShippingLineInput) -> ApiResult<ShippingLine> {
        let input = normalized(input);
        input.validate()?;
        self.client
            .execute(ApiRequest::put(endpoints::item(SHIPPING_LINES, id)?).with_json(&input)?)
            .await
    }

    /// Removes a shipping line.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .execute_empty(ApiRequest::delete(endpoints::item(SHIPPING_LINES, id)?))
            .await
    }
}

fn normalized(input: &ShippingLineInput) -> ShippingLineInput {
    ShippingLineInput {
        code: input.code.trim().to_ascii_uppercase(),
        ..input.clone()
    }
}
