// src/handlers/blocks.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::block::{Block, BlockContent},
};

#[utoipa::path(
    get,
    path = "/api/blocks",
    tag = "Blocks",
    responses((status = 200, description = "Блоки владельца по порядку", body = [Block])),
    security(("api_jwt" = []))
)]
pub async fn list_blocks(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let blocks = app_state.block_service.list(user.id).await?;
    Ok((StatusCode::OK, Json(blocks)))
}

// Нагрузка с дискриминатором "type" внутри - новый блок встаёт в конец.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlockPayload {
    pub content: BlockContent,
}

#[utoipa::path(
    post,
    path = "/api/blocks",
    tag = "Blocks",
    request_body = CreateBlockPayload,
    responses((status = 201, description = "Блок создан", body = Block)),
    security(("api_jwt" = []))
)]
pub async fn create_block(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateBlockPayload>,
) -> Result<impl IntoResponse, AppError> {
    let block = app_state.block_service.create(user.id, payload.content).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

#[utoipa::path(
    put,
    path = "/api/blocks/{id}",
    tag = "Blocks",
    request_body = CreateBlockPayload,
    params(("id" = Uuid, Path, description = "ID блока")),
    responses((status = 200, description = "Блок обновлён", body = Block)),
    security(("api_jwt" = []))
)]
pub async fn update_block(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(block_id): Path<Uuid>,
    Json(payload): Json<CreateBlockPayload>,
) -> Result<impl IntoResponse, AppError> {
    let block = app_state.block_service.update(user.id, block_id, payload.content).await?;
    Ok((StatusCode::OK, Json(block)))
}

#[utoipa::path(
    delete,
    path = "/api/blocks/{id}",
    tag = "Blocks",
    params(("id" = Uuid, Path, description = "ID блока")),
    responses((status = 200, description = "Блок удалён")),
    security(("api_jwt" = []))
)]
pub async fn delete_block(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(block_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.block_service.delete(user.id, block_id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// ---
// Payload: перемещение блока
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MoveBlockPayload {
    // -1 - вверх, +1 - вниз
    #[schema(example = -1)]
    pub direction: i32,
}

impl MoveBlockPayload {
    fn validate_direction(&self) -> Result<(), ValidationError> {
        if self.direction != -1 && self.direction != 1 {
            return Err(ValidationError::new("InvalidDirection"));
        }
        Ok(())
    }
}

// Перемещение на шаг вверх/вниз. Выход за границы списка - не ошибка:
// порядок просто не меняется, как и у кнопок со стрелками.
#[utoipa::path(
    post,
    path = "/api/blocks/{id}/move",
    tag = "Blocks",
    request_body = MoveBlockPayload,
    params(("id" = Uuid, Path, description = "ID блока")),
    responses((status = 200, description = "Актуальный порядок блоков", body = [Block])),
    security(("api_jwt" = []))
)]
pub async fn move_block(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(block_id): Path<Uuid>,
    Json(payload): Json<MoveBlockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate_direction().map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("direction", e);
        AppError::ValidationError(errors)
    })?;

    let blocks = app_state
        .block_service
        .move_block(user.id, block_id, payload.direction)
        .await?;

    Ok((StatusCode::OK, Json(blocks)))
}
