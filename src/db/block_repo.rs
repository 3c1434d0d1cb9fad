// src/db/block_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::block::{Block, BlockContent},
};

#[derive(Clone)]
pub struct BlockRepository {
    pool: PgPool,
}

impl BlockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Блоки владельца в порядке отображения.
    pub async fn list_by_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<Vec<Block>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let blocks = sqlx::query_as::<_, Block>(
            "SELECT * FROM blocks WHERE user_id = $1 ORDER BY position ASC, created_at ASC",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;
        Ok(blocks)
    }

    pub async fn get(&self, user_id: Uuid, block_id: Uuid) -> Result<Option<Block>, AppError> {
        let block = sqlx::query_as::<_, Block>(
            "SELECT * FROM blocks WHERE id = $1 AND user_id = $2",
        )
        .bind(block_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(block)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        position: i32,
        content: &BlockContent,
    ) -> Result<Block, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let block = sqlx::query_as::<_, Block>(
            r#"
            INSERT INTO blocks (user_id, position, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(position)
        .bind(sqlx::types::Json(content))
        .fetch_one(executor)
        .await?;
        Ok(block)
    }

    pub async fn update_content<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        block_id: Uuid,
        content: &BlockContent,
    ) -> Result<Option<Block>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let block = sqlx::query_as::<_, Block>(
            r#"
            UPDATE blocks SET content = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(block_id)
        .bind(user_id)
        .bind(sqlx::types::Json(content))
        .fetch_optional(executor)
        .await?;
        Ok(block)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        block_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM blocks WHERE id = $1 AND user_id = $2")
            .bind(block_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Одна строка пакетной записи порядка: позиция = индекс в списке.
    /// Вызывается для каждого блока внутри одной транзакции.
    pub async fn set_position<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        block_id: Uuid,
        position: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE blocks SET position = $3, updated_at = now() WHERE id = $1 AND user_id = $2")
            .bind(block_id)
            .bind(user_id)
            .bind(position)
            .execute(executor)
            .await?;
        Ok(())
    }
}
