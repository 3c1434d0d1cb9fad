// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

/// Слаг из названия организации: нижний регистр, пробелы -> дефисы.
pub fn slugify(org_name: &str) -> String {
    org_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        org_name: &str,
        org_address: &str,
    ) -> Result<String, AppError> {
        // 1. Хеширование (вне транзакции, базу не трогает)
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Ошибка в задаче хеширования: {}", e))?
            ?;

        // --- НАЧАЛО ТРАНЗАКЦИИ ---
        // Профиль и запись-резерв слага появляются атомарно.
        let mut tx = self.pool.begin().await?;

        // 2. Подбираем свободный слаг: к занятому добавляем -1, -2, ...
        let base = slugify(org_name);
        let base = if base.is_empty() { "org".to_string() } else { base };
        let mut slug = base.clone();
        let mut index = 1;
        while self.user_repo.slug_exists(&mut *tx, &slug).await? {
            slug = format!("{}-{}", base, index);
            index += 1;
        }

        // 3. Создаёт профиль организации
        let new_user = self.user_repo
            .create_user(&mut *tx, email, &hashed_password, org_name, org_address, &slug)
            .await?; // При ошибке транзакция откатится при выходе из области (drop)

        // 4. Резервирует слаг - источник истины для публичной страницы
        self.user_repo.reserve_slug(&mut *tx, &slug, new_user.id).await?;

        // 5. Всё получилось - коммитим.
        tx.commit().await?;
        // --- КОНЕЦ ТРАНЗАКЦИИ ---

        tracing::info!("✅ Зарегистрирована организация '{}' со слагом '{}'", org_name, slug);

        // 6. Генерирует токен (транзакция не нужна)
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        // Неизвестный e-mail и неверный пароль дают один и тот же ответ.
        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Проверка пароля в отдельном потоке
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Ошибка в задаче проверки пароля: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // ---
    // Административные операции
    // ---

    pub async fn list_organizations(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_owners().await
    }

    /// Продлевает подписку организации на N дней от текущего момента.
    pub async fn grant_subscription(&self, user_id: Uuid, days: i64) -> Result<User, AppError> {
        // Убеждаемся, что пользователь существует
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let expires_at = Utc::now() + chrono::Duration::days(days);
        let user = self.user_repo
            .set_subscription_expires_at(&self.pool, user_id, expires_at)
            .await?;

        tracing::info!("Подписка '{}' продлена до {}", user.org_name, expires_at);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_joins_with_dashes() {
        assert_eq!(slugify("Flower Shop"), "flower-shop");
        assert_eq!(slugify("  Цветы   у Аси  "), "цветы-у-аси");
        assert_eq!(slugify("GoLink"), "golink");
    }

    #[test]
    fn slugify_of_blank_name_is_empty() {
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify(""), "");
    }
}
