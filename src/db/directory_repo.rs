// src/db/directory_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::directory::{DirectoryItem, DirectoryKind},
};

#[derive(Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, kind: DirectoryKind) -> Result<Vec<DirectoryItem>, AppError> {
        let items = sqlx::query_as::<_, DirectoryItem>(
            "SELECT * FROM directory_items WHERE kind = $1 ORDER BY name ASC",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Только активные позиции - их видит владелец в редакторе букета.
    pub async fn list_active(&self, kind: DirectoryKind) -> Result<Vec<DirectoryItem>, AppError> {
        let items = sqlx::query_as::<_, DirectoryItem>(
            "SELECT * FROM directory_items WHERE kind = $1 AND is_active ORDER BY name ASC",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        kind: DirectoryKind,
        name: &str,
        price: Decimal,
        image_url: Option<&str>,
        is_active: bool,
    ) -> Result<DirectoryItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, DirectoryItem>(
            r#"
            INSERT INTO directory_items (kind, name, price, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(kind)
        .bind(name)
        .bind(price)
        .bind(image_url)
        .bind(is_active)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        name: &str,
        price: Decimal,
        image_url: Option<&str>,
        is_active: bool,
    ) -> Result<Option<DirectoryItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, DirectoryItem>(
            r#"
            UPDATE directory_items SET
                name = $2,
                price = $3,
                image_url = $4,
                is_active = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(name)
        .bind(price)
        .bind(image_url)
        .bind(is_active)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete<'e, E>(&self, executor: E, item_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM directory_items WHERE id = $1")
            .bind(item_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
