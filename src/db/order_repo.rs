// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::order::{Florist, FloristScore, Order, OrderItem, OrderStatus, OrderStatusChange},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Заказы
    // ---

    /// Создаёт заказ. Состав и сумма после этого не меняются -
    /// обновляющих запросов для них нет.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        items: &[OrderItem],
        total_price: Decimal,
        customer_phone: &str,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id, items, total_price, customer_phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(sqlx::types::Json(items))
        .bind(total_price)
        .bind(customer_phone)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn get<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE id = $1 AND user_id = $2",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET status = $3
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn set_florist<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        order_id: Uuid,
        florist_name: Option<&str>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET florist_name = $3
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .bind(florist_name)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn set_notes<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        order_id: Uuid,
        notes: &str,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET notes = $3
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    // ---
    // История статусов (журнал только на дозапись)
    // ---

    pub async fn append_history<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderStatusChange, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, OrderStatusChange>(
            r#"
            INSERT INTO order_history (order_id, status)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn list_history(&self, order_id: Uuid) -> Result<Vec<OrderStatusChange>, AppError> {
        let entries = sqlx::query_as::<_, OrderStatusChange>(
            "SELECT * FROM order_history WHERE order_id = $1 ORDER BY changed_at DESC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // ---
    // Флористы
    // ---

    pub async fn list_florists(&self, user_id: Uuid) -> Result<Vec<Florist>, AppError> {
        let florists = sqlx::query_as::<_, Florist>(
            "SELECT * FROM florists WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(florists)
    }

    pub async fn create_florist<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        name: &str,
    ) -> Result<Florist, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let florist = sqlx::query_as::<_, Florist>(
            r#"
            INSERT INTO florists (user_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(florist)
    }

    // ---
    // Статистика
    // ---

    pub async fn status_counts(&self, user_id: Uuid) -> Result<Vec<(OrderStatus, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (OrderStatus, i64)>(
            "SELECT status, COUNT(*) FROM orders WHERE user_id = $1 GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Рейтинг флористов по выполненным заказам; неназначенные
    /// группируются под подписью "Не назначен".
    pub async fn florist_leaderboard(&self, user_id: Uuid) -> Result<Vec<FloristScore>, AppError> {
        let rows = sqlx::query_as::<_, FloristScore>(
            r#"
            SELECT COALESCE(florist_name, 'Не назначен') AS name, COUNT(*) AS completed
            FROM orders
            WHERE user_id = $1 AND status = 'completed'
            GROUP BY 1
            ORDER BY 2 DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
