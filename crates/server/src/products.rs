//! `/products-info` HTTP routes. The only place where service errors become status codes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use product_info_core::{
    ApplicationError, InterfaceError, NewProduct, NewProductDto, Product, ProductDto, ProductId,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::service::ProductService;

#[derive(Clone)]
pub struct ProductsState {
    service: ProductService,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
    pub correlation_id: String,
}

pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl From<InterfaceError> for ApiError {
    fn from(error: InterfaceError) -> Self {
        let status = match &error {
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiErrorBody {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: error.user_message().to_string(),
            correlation_id: error.correlation_id().to_string(),
        };
        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(error: ApplicationError) -> ApiError {
    let correlation_id = Uuid::new_v4().to_string();
    warn!(
        event_name = "product.http.request_failed",
        correlation_id = %correlation_id,
        error = %error,
        "product request failed"
    );
    ApiError::from(error.into_interface(correlation_id))
}

pub fn router(service: ProductService) -> Router {
    Router::new()
        .route("/products-info", post(add_product).put(update_product))
        .route("/products-info/{product_id}", get(get_product).delete(delete_product))
        .with_state(ProductsState { service })
}

pub async fn get_product(
    Path(product_id): Path<i64>,
    State(state): State<ProductsState>,
) -> Result<Json<ProductDto>, ApiError> {
    let dto = state.service.get_product_by_id(ProductId(product_id)).await.map_err(api_error)?;
    Ok(Json(dto))
}

pub async fn add_product(
    State(state): State<ProductsState>,
    Json(payload): Json<NewProductDto>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let dto = state.service.add_new_product(NewProduct::from(payload)).await.map_err(api_error)?;
    info!(event_name = "product.http.created", product_id = dto.id.0, "product created");
    Ok((StatusCode::CREATED, Json(dto)))
}

pub async fn update_product(
    State(state): State<ProductsState>,
    Json(payload): Json<ProductDto>,
) -> Result<Json<ProductDto>, ApiError> {
    let dto = state.service.update_product(Product::from(payload)).await.map_err(api_error)?;
    Ok(Json(dto))
}

pub async fn delete_product(
    Path(product_id): Path<i64>,
    State(state): State<ProductsState>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_product_by_id(ProductId(product_id)).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
