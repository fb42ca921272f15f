//! Domain services: one thin struct per REST resource.
//!
//! Every service shares the same [`ApiClient`](crate::ApiClient), so tokens
//! and refreshes are handled in one place. Inputs are validated before any
//! request is sent.

mod admin;
mod audit;
mod auth;
mod container;
mod equipment;
mod gate;
mod profile;
mod shipping_line;
mod vehicle;
mod yard;

pub use admin::AdminService;
pub use audit::AuditLogService;
pub use auth::AuthService;
pub use container::ContainerService;
pub use equipment::EquipmentService;
pub use gate::GateOperationService;
pub use profile::ProfileService;
pub use shipping_line::ShippingLineService;
pub use vehicle::VehicleService;
pub use yard::YardService;

use quay_domain::{ApiRequest, ListResponse, Page, PageRequest, QueryParams, ToQuery};
use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Fetches one page of a collection, whatever envelope the server uses.
async fn fetch_page<T: DeserializeOwned>(
    client: &ApiClient,
    path: &str,
    filter: &(dyn ToQuery + Sync),
    page: PageRequest,
) -> ApiResult<Page<T>> {
    let mut query = filter.to_query();
    query.extend(page.to_query());
    let list: ListResponse<T> = client
        .execute(ApiRequest::get(path).with_query(query))
        .await?;
    Ok(list.into_page())
}

/// Filter for collections that take no search parameters.
struct Unfiltered;

impl ToQuery for Unfiltered {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
    }
}
