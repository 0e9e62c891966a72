use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use service::customer::{CreateCustomerRequest, Customer, CustomerUpdate};
use tracing::info;

use crate::{errors::JsonApiError, routes::ServerState};

/// Optional query parameters of `PUT /api/v1/customers/{id}`
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateCustomerParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<UpdateCustomerParams> for CustomerUpdate {
    fn from(p: UpdateCustomerParams) -> Self {
        CustomerUpdate { name: p.name, email: p.email, address: p.address }
    }
}

#[utoipa::path(
    get, path = "/api/v1/customers", tag = "customers",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::CustomerDoc]),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Customer>>, JsonApiError> {
    let customers = state.customers.list_customers().await?;
    info!(count = customers.len(), "list customers");
    Ok(Json(customers))
}

#[utoipa::path(
    post, path = "/api/v1/customers", tag = "customers",
    request_body = crate::openapi::CreateCustomerRequestDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 409, description = "Email already taken"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateCustomerRequest>,
) -> Result<StatusCode, JsonApiError> {
    info!(name = %input.name, email = %input.email, address = %input.address, "customer_create_request");
    state.customers.create_customer(input).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get, path = "/api/v1/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CustomerDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<Customer>, JsonApiError> {
    Ok(Json(state.customers.get_customer(id).await?))
}

#[utoipa::path(
    put, path = "/api/v1/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer ID"), UpdateCustomerParams),
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Email already taken"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(params): Query<UpdateCustomerParams>,
) -> Result<StatusCode, JsonApiError> {
    info!(
        id,
        name = ?params.name,
        email = ?params.email,
        address = ?params.address,
        "customer_update_request"
    );
    state.customers.update_customer(id, params.into()).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete, path = "/api/v1/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<StatusCode, JsonApiError> {
    info!(id, "customer_delete_request");
    state.customers.delete_customer(id).await?;
    Ok(StatusCode::OK)
}
