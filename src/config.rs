// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{BlockRepository, DirectoryRepository, InventoryRepository, OrderRepository, UserRepository},
    services::{
        auth::AuthService, block_service::BlockService, directory_service::DirectoryService,
        inventory_service::InventoryService, order_service::OrderService,
        profile_service::ProfileService, storage::ObjectStorage,
    },
};

// Общее состояние, доступное во всём приложении
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
    pub block_service: BlockService,
    pub order_service: OrderService,
    pub inventory_service: InventoryService,
    pub directory_service: DirectoryService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL должна быть задана");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET должен быть задан");
        let s3_bucket = env::var("S3_BUCKET").expect("S3_BUCKET должен быть задан");
        let s3_public_base_url =
            env::var("S3_PUBLIC_BASE_URL").expect("S3_PUBLIC_BASE_URL должен быть задан");

        // Подключение к базе данных; '?' пробрасывает ошибку наверх
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Соединение с базой данных установлено!");

        // Клиент объектного хранилища (логотипы, обложки, товары)
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3_client = aws_sdk_s3::Client::new(&aws_config);
        let storage = ObjectStorage::new(s3_client, s3_bucket, s3_public_base_url);

        // --- Сборка графа зависимостей ---
        let user_repo = UserRepository::new(db_pool.clone());
        let block_repo = BlockRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let directory_repo = DirectoryRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone(), db_pool.clone());
        let profile_service = ProfileService::new(user_repo.clone(), storage, db_pool.clone());
        let block_service = BlockService::new(block_repo.clone(), db_pool.clone());
        let order_service = OrderService::new(order_repo, block_repo, db_pool.clone());
        let inventory_service = InventoryService::new(inventory_repo, db_pool.clone());
        let directory_service = DirectoryService::new(directory_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            profile_service,
            block_service,
            order_service,
            inventory_service,
            directory_service,
        })
    }
}
