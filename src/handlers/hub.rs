// src/handlers/hub.rs
//
// Центр управления: доска заказов, флористы и статистика.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::order::{Florist, HubStats, Order, OrderStatus, OrderStatusChange},
};

#[utoipa::path(
    get,
    path = "/api/hub/orders",
    tag = "Hub",
    responses((status = 200, description = "Заказы, новые сверху", body = [Order])),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list(user.id).await?;
    Ok((StatusCode::OK, Json(orders)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusPayload {
    #[schema(example = "inProgress")]
    pub status: OrderStatus,
}

// Смена статуса с записью в историю. Недопустимый переход - 409.
#[utoipa::path(
    put,
    path = "/api/hub/orders/{id}/status",
    tag = "Hub",
    request_body = ChangeStatusPayload,
    params(("id" = Uuid, Path, description = "ID заказа")),
    responses(
        (status = 200, description = "Статус обновлён", body = Order),
        (status = 409, description = "Недопустимый переход")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<ChangeStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .change_status(user.id, order_id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignFloristPayload {
    // None/пустая строка - снять назначение
    pub florist_name: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/hub/orders/{id}/florist",
    tag = "Hub",
    request_body = AssignFloristPayload,
    params(("id" = Uuid, Path, description = "ID заказа")),
    responses(
        (status = 200, description = "Флорист назначен", body = Order),
        (status = 409, description = "Заказ уже закрыт")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_florist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<AssignFloristPayload>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload
        .florist_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let order = app_state
        .order_service
        .assign_florist(user.id, order_id, name)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNotesPayload {
    #[schema(example = "Клиент просил не звонить, добавить открытку")]
    pub notes: String,
}

#[utoipa::path(
    put,
    path = "/api/hub/orders/{id}/notes",
    tag = "Hub",
    request_body = UpdateNotesPayload,
    params(("id" = Uuid, Path, description = "ID заказа")),
    responses((status = 200, description = "Заметки сохранены", body = Order)),
    security(("api_jwt" = []))
)]
pub async fn update_notes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateNotesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .update_notes(user.id, order_id, &payload.notes)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/hub/orders/{id}/history",
    tag = "Hub",
    params(("id" = Uuid, Path, description = "ID заказа")),
    responses((status = 200, description = "История статусов, новые сверху", body = [OrderStatusChange])),
    security(("api_jwt" = []))
)]
pub async fn order_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state.order_service.history(user.id, order_id).await?;
    Ok((StatusCode::OK, Json(history)))
}

// ---
// Флористы
// ---

#[utoipa::path(
    get,
    path = "/api/hub/florists",
    tag = "Hub",
    responses((status = 200, description = "Флористы организации", body = [Florist])),
    security(("api_jwt" = []))
)]
pub async fn list_florists(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let florists = app_state.order_service.list_florists(user.id).await?;
    Ok((StatusCode::OK, Json(florists)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFloristPayload {
    #[validate(length(min = 1, message = "Имя флориста обязательно."))]
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/hub/florists",
    tag = "Hub",
    request_body = CreateFloristPayload,
    responses((status = 201, description = "Флорист добавлен", body = Florist)),
    security(("api_jwt" = []))
)]
pub async fn create_florist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateFloristPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let florist = app_state.order_service.add_florist(user.id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(florist)))
}

// ---
// Статистика
// ---

#[utoipa::path(
    get,
    path = "/api/hub/stats",
    tag = "Hub",
    responses((status = 200, description = "Показатели доски заказов", body = HubStats)),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.order_service.stats(user.id).await?;
    Ok((StatusCode::OK, Json(stats)))
}
