// src/services/inventory_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::InventoryRepository, models::inventory::InventoryItem};

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository, pool: PgPool) -> Self {
        Self { inventory_repo, pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<InventoryItem>, AppError> {
        self.inventory_repo.list_by_user(user_id).await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        price: Decimal,
        cost_price: Decimal,
        stock_quantity: i32,
        image_url: Option<&str>,
    ) -> Result<InventoryItem, AppError> {
        self.inventory_repo
            .create(&self.pool, user_id, name, price, cost_price, stock_quantity, image_url)
            .await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        name: &str,
        price: Decimal,
        cost_price: Decimal,
        stock_quantity: i32,
        image_url: Option<&str>,
    ) -> Result<InventoryItem, AppError> {
        self.inventory_repo
            .update(&self.pool, user_id, item_id, name, price, cost_price, stock_quantity, image_url)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn delete(&self, user_id: Uuid, item_id: Uuid) -> Result<(), AppError> {
        let deleted = self.inventory_repo.delete(&self.pool, user_id, item_id).await?;
        if deleted == 0 {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }
}
