// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::inventory::InventoryItem,
};

// ---
// Валидация: цены не бывают отрицательными
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Значение не может быть отрицательным.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: товар на складе
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemPayload {
    #[validate(length(min = 1, message = "Название обязательно."))]
    pub name: String,

    #[validate(custom(function = validate_not_negative))]
    pub price: Decimal,

    #[validate(custom(function = validate_not_negative))]
    #[serde(default)]
    pub cost_price: Decimal,

    #[validate(range(min = 0, message = "Остаток не может быть отрицательным."))]
    #[serde(default)]
    pub stock_quantity: i32,

    pub image_url: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/hub/inventory",
    tag = "Inventory",
    responses((status = 200, description = "Склад организации", body = [InventoryItem])),
    security(("api_jwt" = []))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.inventory_service.list(user.id).await?;
    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/hub/inventory",
    tag = "Inventory",
    request_body = InventoryItemPayload,
    responses((status = 201, description = "Товар добавлен", body = InventoryItem)),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<InventoryItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .inventory_service
        .create(
            user.id,
            &payload.name,
            payload.price,
            payload.cost_price,
            payload.stock_quantity,
            payload.image_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/hub/inventory/{id}",
    tag = "Inventory",
    request_body = InventoryItemPayload,
    params(("id" = Uuid, Path, description = "ID товара")),
    responses((status = 200, description = "Товар обновлён", body = InventoryItem)),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<InventoryItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .inventory_service
        .update(
            user.id,
            item_id,
            &payload.name,
            payload.price,
            payload.cost_price,
            payload.stock_quantity,
            payload.image_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    delete,
    path = "/api/hub/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID товара")),
    responses((status = 200, description = "Товар удалён")),
    security(("api_jwt" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete(user.id, item_id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}
