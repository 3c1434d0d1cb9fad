// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Единый тип ошибки приложения, с `thiserror` для эргономики.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Ошибка валидации")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail уже существует")]
    EmailAlreadyExists,

    #[error("Неверные учётные данные")]
    InvalidCredentials,

    #[error("Недействительный токен")]
    InvalidToken,

    #[error("Недостаточно прав")]
    Forbidden,

    #[error("Пользователь не найден")]
    UserNotFound,

    // Публичная страница: отсутствующий слаг и отсутствующий профиль
    // намеренно неразличимы для посетителя.
    #[error("Профиль не найден")]
    ProfileNotFound,

    #[error("Блок не найден")]
    BlockNotFound,

    #[error("Заказ не найден")]
    OrderNotFound,

    #[error("Элемент не найден")]
    ItemNotFound,

    #[error("Пустой выбор букета")]
    EmptySelection,

    #[error("В блоке не указан номер WhatsApp")]
    WhatsappNumberMissing,

    #[error("Товар не найден в каталоге")]
    ProductNotFound,

    #[error("Заказ этого товара уже оформляется")]
    SubmissionInFlight,

    #[error("Недопустимая смена статуса: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Заказ закрыт")]
    OrderClosed,

    #[error("В галерее не может быть больше {0} изображений")]
    GalleryLimitExceeded(usize),

    #[error("Некорректные данные изображения")]
    InvalidImageData,

    // Вариант для ошибок базы данных (sqlx)
    #[error("Ошибка базы данных")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ошибка хранилища файлов: {0}")]
    StorageError(String),

    // Общий вариант для любых неожиданных ошибок.
    // `anyhow::Error` сохраняет контекст ошибки.
    #[error("Внутренняя ошибка сервера")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Ошибка Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Ошибка JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Возвращаем все детали валидации по полям.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Одно или несколько полей заполнены неверно.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Этот e-mail уже используется.".to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Неверный логин или пароль.".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Токен аутентификации недействителен или отсутствует.".to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Недостаточно прав для этого действия.".to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Пользователь не найден.".to_string()),
            AppError::ProfileNotFound => (StatusCode::NOT_FOUND, "Профиль не найден".to_string()),
            AppError::BlockNotFound => (StatusCode::NOT_FOUND, "Блок не найден.".to_string()),
            AppError::OrderNotFound => (StatusCode::NOT_FOUND, "Заказ не найден.".to_string()),
            AppError::ItemNotFound => (StatusCode::NOT_FOUND, "Элемент не найден.".to_string()),
            AppError::EmptySelection => (StatusCode::BAD_REQUEST, "Выберите хотя бы один цветок.".to_string()),
            AppError::WhatsappNumberMissing => (StatusCode::BAD_REQUEST, "Для этого блока не настроен номер WhatsApp.".to_string()),
            AppError::ProductNotFound => (StatusCode::BAD_REQUEST, "Товар не найден в каталоге.".to_string()),
            AppError::SubmissionInFlight => (StatusCode::CONFLICT, "Заказ этого товара уже оформляется, подождите.".to_string()),
            AppError::InvalidStatusTransition { from, to } => (
                StatusCode::CONFLICT,
                format!("Нельзя перевести заказ из статуса '{}' в '{}'.", from, to),
            ),
            AppError::OrderClosed => (StatusCode::CONFLICT, "Заказ уже закрыт - изменения недоступны.".to_string()),
            AppError::GalleryLimitExceeded(max) => (
                StatusCode::BAD_REQUEST,
                format!("В галерее не может быть больше {} изображений.", max),
            ),
            AppError::InvalidImageData => (StatusCode::BAD_REQUEST, "Некорректные данные изображения.".to_string()),

            // Все остальные ошибки (DatabaseError, StorageError, ...) превращаются в 500.
            // `tracing` запишет подробное сообщение, которое дал `thiserror`.
            ref e => {
                tracing::error!("Внутренняя ошибка сервера: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Произошла непредвиденная ошибка.".to_string())
            }
        };

        // Стандартный ответ для простых ошибок с одним сообщением.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
