pub mod customers;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::customer::{CustomerRepository, CustomerService};

use crate::openapi::ApiDoc;

pub const CUSTOMERS_PATH: &str = "/api/v1/customers";

/// Shared router state; the store behind the service is chosen at startup.
#[derive(Clone)]
pub struct ServerState {
    pub customers: Arc<CustomerService<dyn CustomerRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn CustomerRepository>) -> Self {
        Self { customers: Arc::new(CustomerService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: customer CRUD, health and the OpenAPI document
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let customer_routes = Router::new()
        .route(CUSTOMERS_PATH, get(customers::list).post(customers::create))
        .route(
            &format!("{CUSTOMERS_PATH}/:id"),
            get(customers::get).put(customers::update).delete(customers::delete),
        );

    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    public
        .merge(customer_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
