// src/services/directory_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DirectoryRepository,
    models::directory::{DirectoryItem, DirectoryKind},
};

// Глобальные справочники цветов и упаковок. Пишет только
// администратор; владельцы читают активные позиции при настройке
// конструктора букета и копируют цены себе в блок.
#[derive(Clone)]
pub struct DirectoryService {
    directory_repo: DirectoryRepository,
    pool: PgPool,
}

impl DirectoryService {
    pub fn new(directory_repo: DirectoryRepository, pool: PgPool) -> Self {
        Self { directory_repo, pool }
    }

    pub async fn list(&self, kind: DirectoryKind) -> Result<Vec<DirectoryItem>, AppError> {
        self.directory_repo.list(kind).await
    }

    pub async fn list_active(&self, kind: DirectoryKind) -> Result<Vec<DirectoryItem>, AppError> {
        self.directory_repo.list_active(kind).await
    }

    pub async fn create(
        &self,
        kind: DirectoryKind,
        name: &str,
        price: Decimal,
        image_url: Option<&str>,
        is_active: bool,
    ) -> Result<DirectoryItem, AppError> {
        self.directory_repo
            .create(&self.pool, kind, name, price, image_url, is_active)
            .await
    }

    pub async fn update(
        &self,
        item_id: Uuid,
        name: &str,
        price: Decimal,
        image_url: Option<&str>,
        is_active: bool,
    ) -> Result<DirectoryItem, AppError> {
        self.directory_repo
            .update(&self.pool, item_id, name, price, image_url, is_active)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn delete(&self, item_id: Uuid) -> Result<(), AppError> {
        let deleted = self.directory_repo.delete(&self.pool, item_id).await?;
        if deleted == 0 {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }
}
