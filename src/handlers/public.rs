// src/handlers/public.rs

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::block::{Block, BlockContent},
    services::order_service::OrderSubmission,
};

// ---
// Публичная страница
// ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicBlockView {
    pub id: Uuid,
    pub position: i32,
    pub content: BlockContent,
    // Снимок обратного отсчёта для промо-блоков; дальше тикает клиент.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicPageResponse {
    pub org_name: String,
    pub org_address: String,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub show_profile: bool,
    pub blocks: Vec<PublicBlockView>,
}

fn block_view(block: Block, now: DateTime<Utc>) -> PublicBlockView {
    let countdown = match &block.content {
        BlockContent::Promo(promo) => Some(promo.countdown(now).to_string()),
        _ => None,
    };
    PublicBlockView {
        id: block.id,
        position: block.position,
        content: block.content,
        countdown,
    }
}

// Чтение страницы по слагу: резерв слага -> профиль -> блоки.
#[utoipa::path(
    get,
    path = "/api/u/{slug}",
    tag = "Public",
    params(("slug" = String, Path, description = "Слаг организации")),
    responses(
        (status = 200, description = "Публичная страница", body = PublicPageResponse),
        (status = 404, description = "Профиль не найден")
    )
)]
pub async fn get_public_page(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = app_state.profile_service.public_profile(&slug).await?;
    let blocks = app_state.block_service.list(profile.id).await?;

    let now = Utc::now();
    let response = PublicPageResponse {
        org_name: profile.org_name,
        org_address: profile.org_address,
        logo_url: profile.logo_url,
        cover_url: profile.cover_url,
        show_profile: profile.show_profile,
        blocks: blocks.into_iter().map(|b| block_view(b, now)).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

// ---
// Оформление заказов посетителем
// ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BouquetOrderPayload {
    pub block_id: Uuid,
    // id цветка -> количество; нулевые записи отбрасываются
    pub selection: HashMap<String, u32>,
    pub wrapping_id: Option<String>,
}

// Ссылка wa.me в ответе формируется до записи заказа и возвращается
// даже при недоступной базе - см. поле `persisted`.
#[utoipa::path(
    post,
    path = "/api/u/{slug}/orders/bouquet",
    tag = "Public",
    request_body = BouquetOrderPayload,
    params(("slug" = String, Path, description = "Слаг организации")),
    responses(
        (status = 200, description = "Заказ собран, ссылка для чата готова", body = OrderSubmission),
        (status = 400, description = "Пустой выбор или нет номера WhatsApp")
    )
)]
pub async fn submit_bouquet_order(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<BouquetOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let profile = app_state.profile_service.public_profile(&slug).await?;

    let submission = app_state
        .order_service
        .submit_bouquet_order(profile.id, payload.block_id, payload.selection, payload.wrapping_id)
        .await?;

    Ok((StatusCode::OK, Json(submission)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrderPayload {
    pub block_id: Uuid,
    pub product_index: usize,
}

// Кнопка "Купить" у товара каталога: заказ из одной позиции.
// Повторный клик по тому же товару до завершения первого - 409.
#[utoipa::path(
    post,
    path = "/api/u/{slug}/orders/product",
    tag = "Public",
    request_body = ProductOrderPayload,
    params(("slug" = String, Path, description = "Слаг организации")),
    responses(
        (status = 200, description = "Заказ собран, ссылка для чата готова", body = OrderSubmission),
        (status = 409, description = "Заказ этого товара уже оформляется")
    )
)]
pub async fn submit_product_order(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<ProductOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let profile = app_state.profile_service.public_profile(&slug).await?;

    let submission = app_state
        .order_service
        .submit_product_order(profile.id, payload.block_id, payload.product_index)
        .await?;

    Ok((StatusCode::OK, Json(submission)))
}
