// src/handlers/admin.rs
//
// Админ-панель: организации, подписки и глобальные справочники.

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
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::{
        auth::User,
        directory::{DirectoryItem, DirectoryKind},
    },
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Цена не может быть отрицательной.".into());
        return Err(err);
    }
    Ok(())
}

fn parse_kind(segment: &str) -> Result<DirectoryKind, AppError> {
    DirectoryKind::from_path(segment).ok_or(AppError::ItemNotFound)
}

// ---
// Организации
// ---

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses((status = 200, description = "Организации платформы", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.auth_service.list_organizations().await?;
    Ok((StatusCode::OK, Json(users)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GrantSubscriptionPayload {
    #[validate(range(min = 1, max = 3650, message = "Срок должен быть от 1 до 3650 дней."))]
    #[schema(example = 30)]
    pub days: i64,
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/subscription",
    tag = "Admin",
    request_body = GrantSubscriptionPayload,
    params(("id" = Uuid, Path, description = "ID организации")),
    responses((status = 200, description = "Подписка продлена", body = User)),
    security(("api_jwt" = []))
)]
pub async fn grant_subscription(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<GrantSubscriptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.auth_service.grant_subscription(user_id, payload.days).await?;
    Ok((StatusCode::OK, Json(user)))
}

// ---
// Справочники (цветы и упаковки)
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryItemPayload {
    #[validate(length(min = 1, message = "Название обязательно."))]
    pub name: String,

    #[validate(custom(function = validate_not_negative))]
    pub price: Decimal,

    pub image_url: Option<String>,

    // Скрытые позиции не попадают в редактор конструктора букета
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[utoipa::path(
    get,
    path = "/api/admin/directories/{kind}",
    tag = "Admin",
    params(("kind" = String, Path, description = "flowers или wrappings")),
    responses((status = 200, description = "Все позиции справочника", body = [DirectoryItem])),
    security(("api_jwt" = []))
)]
pub async fn list_directory(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;
    let items = app_state.directory_service.list(kind).await?;
    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/admin/directories/{kind}",
    tag = "Admin",
    request_body = DirectoryItemPayload,
    params(("kind" = String, Path, description = "flowers или wrappings")),
    responses((status = 201, description = "Позиция добавлена", body = DirectoryItem)),
    security(("api_jwt" = []))
)]
pub async fn create_directory_item(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(kind): Path<String>,
    Json(payload): Json<DirectoryItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let kind = parse_kind(&kind)?;
    let item = app_state
        .directory_service
        .create(kind, &payload.name, payload.price, payload.image_url.as_deref(), payload.is_active)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/admin/directories/{kind}/{id}",
    tag = "Admin",
    request_body = DirectoryItemPayload,
    params(
        ("kind" = String, Path, description = "flowers или wrappings"),
        ("id" = Uuid, Path, description = "ID позиции")
    ),
    responses((status = 200, description = "Позиция обновлена", body = DirectoryItem)),
    security(("api_jwt" = []))
)]
pub async fn update_directory_item(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path((kind, item_id)): Path<(String, Uuid)>,
    Json(payload): Json<DirectoryItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    parse_kind(&kind)?;
    let item = app_state
        .directory_service
        .update(item_id, &payload.name, payload.price, payload.image_url.as_deref(), payload.is_active)
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/directories/{kind}/{id}",
    tag = "Admin",
    params(
        ("kind" = String, Path, description = "flowers или wrappings"),
        ("id" = Uuid, Path, description = "ID позиции")
    ),
    responses((status = 200, description = "Позиция удалена")),
    security(("api_jwt" = []))
)]
pub async fn delete_directory_item(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path((kind, item_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    parse_kind(&kind)?;
    app_state.directory_service.delete(item_id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// ---
// Чтение справочника владельцем
// ---
// Редактор конструктора букета показывает только активные позиции,
// из которых владелец копирует цены к себе в блок.

#[utoipa::path(
    get,
    path = "/api/directories/{kind}",
    tag = "Admin",
    params(("kind" = String, Path, description = "flowers или wrappings")),
    responses((status = 200, description = "Активные позиции справочника", body = [DirectoryItem])),
    security(("api_jwt" = []))
)]
pub async fn list_active_directory(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;
    let items = app_state.directory_service.list_active(kind).await?;
    Ok((StatusCode::OK, Json(items)))
}
