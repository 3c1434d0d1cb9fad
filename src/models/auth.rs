// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Роль пользователя: владелец организации или администратор платформы.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Admin,
}

// Пользователь (он же профиль организации), как он приходит из базы.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // ВАЖНО для безопасности
    pub password_hash: String,

    pub role: UserRole,
    pub org_name: String,
    pub org_address: String,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,

    // Слаг неизменяем после создания; уникальность обеспечивает
    // таблица-резерв slugs.
    pub slug: String,
    pub show_profile: bool,
    pub subscription_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Данные для регистрации новой организации
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "Указан некорректный e-mail."))]
    pub email: String,
    #[validate(length(min = 6, message = "Пароль должен содержать минимум 6 символов."))]
    pub password: String,
    #[validate(length(min = 1, message = "Название организации обязательно."))]
    pub org_name: String,
    #[serde(default)]
    pub org_address: String,
}

// Данные для входа
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "Указан некорректный e-mail."))]
    pub email: String,
    #[validate(length(min = 6, message = "Пароль должен содержать минимум 6 символов."))]
    pub password: String,
}

// Ответ аутентификации с токеном
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Структура данных ("claims") внутри JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID пользователя)
    pub exp: usize, // Когда токен истекает
    pub iat: usize, // Когда токен выпущен
}
