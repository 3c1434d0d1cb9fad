// src/handlers/profile.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::User,
    services::storage::MediaPurpose,
};

// ---
// Payload: частичное обновление профиля
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    pub org_name: Option<String>,
    pub org_address: Option<String>,
    pub show_profile: Option<bool>,
}

#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "Profile",
    request_body = UpdateProfilePayload,
    responses((status = 200, description = "Профиль обновлён", body = User)),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state
        .profile_service
        .update_profile(
            user.id,
            payload.org_name.as_deref(),
            payload.org_address.as_deref(),
            payload.show_profile,
        )
        .await?;

    Ok((StatusCode::OK, Json(updated)))
}

// ---
// Payload: загрузка картинки (data-URL из кроппера)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadImagePayload {
    #[validate(length(min = 1, message = "Изображение обязательно."))]
    pub image_data: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
}

#[utoipa::path(
    post,
    path = "/api/profile/logo",
    tag = "Profile",
    request_body = UploadImagePayload,
    responses((status = 200, description = "Логотип загружен", body = UploadedImage)),
    security(("api_jwt" = []))
)]
pub async fn upload_logo(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UploadImagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let url = app_state.profile_service.upload_logo(user.id, &payload.image_data).await?;
    Ok((StatusCode::OK, Json(UploadedImage { url })))
}

#[utoipa::path(
    delete,
    path = "/api/profile/logo",
    tag = "Profile",
    responses((status = 200, description = "Логотип удалён")),
    security(("api_jwt" = []))
)]
pub async fn delete_logo(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    app_state.profile_service.delete_logo(user.id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

#[utoipa::path(
    post,
    path = "/api/profile/cover",
    tag = "Profile",
    request_body = UploadImagePayload,
    responses((status = 200, description = "Обложка загружена", body = UploadedImage)),
    security(("api_jwt" = []))
)]
pub async fn upload_cover(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UploadImagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let url = app_state.profile_service.upload_cover(user.id, &payload.image_data).await?;
    Ok((StatusCode::OK, Json(UploadedImage { url })))
}

#[utoipa::path(
    delete,
    path = "/api/profile/cover",
    tag = "Profile",
    responses((status = 200, description = "Обложка удалена")),
    security(("api_jwt" = []))
)]
pub async fn delete_cover(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    app_state.profile_service.delete_cover(user.id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// ---
// Общая загрузка медиа для редакторов блоков
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMediaPayload {
    pub purpose: MediaPurpose,

    #[validate(length(min = 1, message = "Изображение обязательно."))]
    pub image_data: String,
}

#[utoipa::path(
    post,
    path = "/api/media",
    tag = "Profile",
    request_body = UploadMediaPayload,
    responses((status = 200, description = "Файл загружен", body = UploadedImage)),
    security(("api_jwt" = []))
)]
pub async fn upload_media(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UploadMediaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Справочники загружает только администратор.
    if payload.purpose.is_admin_only() && user.role != crate::models::auth::UserRole::Admin {
        return Err(AppError::Forbidden);
    }

    let url = app_state
        .profile_service
        .upload_media(user.id, payload.purpose, &payload.image_data)
        .await?;

    Ok((StatusCode::OK, Json(UploadedImage { url })))
}
