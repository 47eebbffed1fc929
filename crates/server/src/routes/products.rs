use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use service::products::{Fields, Product};
use tracing::debug;

use crate::errors::ApiError;
use crate::state::AppState;

/// `{id}` must be plain ASCII digits (no sign, no whitespace) that fit a `u64`;
/// anything else cannot name a record.
fn product_id(id: Result<Path<String>, PathRejection>) -> Result<u64, ApiError> {
    let raw = match id {
        Ok(Path(raw)) => raw,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable product id");
            return Err(ApiError::NotFound);
        }
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        debug!(id = %raw, "product id is not a plain integer");
        return Err(ApiError::NotFound);
    }
    raw.parse().map_err(|_| {
        debug!(id = %raw, "product id out of range");
        ApiError::NotFound
    })
}

fn body(payload: Result<Json<Fields>, JsonRejection>) -> Result<Fields, ApiError> {
    payload
        .map(|Json(fields)| fields)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// List every product.
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let items = state.products.list().await?;
    debug!(count = items.len(), "listing products");
    Ok(Json(items))
}

/// Fetch one product by id.
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = product_id(id)?;
    state.products.get(id).await?.map(Json).ok_or(ApiError::NotFound)
}

/// Create a product; the server assigns its id.
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let fields = body(payload)?;
    let created = state.products.create(fields).await?;
    Ok(Json(created))
}

/// Shallow-merge the body into an existing product.
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = product_id(id)?;
    let patch = body(payload)?;
    let updated = state.products.update(id, patch).await?;
    Ok(Json(updated))
}

/// Remove a product; 204 on success.
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = product_id(id)?;
    if state.products.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
