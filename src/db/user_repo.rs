// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Чтение
    // ---
    // Читающие функции простые и используют основную пулу.

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Разрешает слаг в uid через таблицу-резерв (источник истины).
    pub async fn resolve_slug(&self, slug: &str) -> Result<Option<Uuid>, AppError> {
        let uid = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM slugs WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(uid)
    }

    // Список организаций для админ-панели (без самих админов).
    pub async fn list_owners(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'owner' ORDER BY org_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // ---
    // Запись (транзакционная)
    // ---
    // Эти функции принимают обобщённый 'Executor', чтобы работать
    // внутри транзакции регистрации.

    pub async fn slug_exists<'e, E>(&self, executor: E, slug: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM slugs WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        org_name: &str,
        org_address: &str,
        slug: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, org_name, org_address, slug)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(org_name)
        .bind(org_address)
        .bind(slug)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("email") {
                        return AppError::EmailAlreadyExists;
                    }
                }
            }
            e.into()
        })
    }

    /// Создаёт запись-резерв слага. Вызывается в той же транзакции,
    /// что и создание профиля.
    pub async fn reserve_slug<'e, E>(
        &self,
        executor: E,
        slug: &str,
        user_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO slugs (slug, user_id) VALUES ($1, $2)")
            .bind(slug)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Частичное обновление профиля в стиле merge: None оставляет
    // прежнее значение.
    pub async fn update_profile<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        org_name: Option<&str>,
        org_address: Option<&str>,
        show_profile: Option<bool>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                org_name = COALESCE($2, org_name),
                org_address = COALESCE($3, org_address),
                show_profile = COALESCE($4, show_profile),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(org_name)
        .bind(org_address)
        .bind(show_profile)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }

    pub async fn set_logo_url<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        logo_url: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET logo_url = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(logo_url)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_cover_url<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        cover_url: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET cover_url = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(cover_url)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Админ продлевает подписку организации до указанной даты.
    pub async fn set_subscription_expires_at<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET subscription_expires_at = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }
}
