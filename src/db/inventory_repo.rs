// src/db/inventory_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::inventory::InventoryItem};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        name: &str,
        price: Decimal,
        cost_price: Decimal,
        stock_quantity: i32,
        image_url: Option<&str>,
    ) -> Result<InventoryItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (user_id, name, price, cost_price, stock_quantity, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(price)
        .bind(cost_price)
        .bind(stock_quantity)
        .bind(image_url)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        item_id: Uuid,
        name: &str,
        price: Decimal,
        cost_price: Decimal,
        stock_quantity: i32,
        image_url: Option<&str>,
    ) -> Result<Option<InventoryItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items SET
                name = $3,
                price = $4,
                cost_price = $5,
                stock_quantity = $6,
                image_url = $7,
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(name)
        .bind(price)
        .bind(cost_price)
        .bind(stock_quantity)
        .bind(image_url)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        item_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
