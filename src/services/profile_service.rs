// src/services/profile_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::User,
    services::storage::{cover_key, logo_key, media_key, MediaPurpose, ObjectStorage},
};

#[derive(Clone)]
pub struct ProfileService {
    user_repo: UserRepository,
    storage: ObjectStorage,
    pool: PgPool,
}

impl ProfileService {
    pub fn new(user_repo: UserRepository, storage: ObjectStorage, pool: PgPool) -> Self {
        Self { user_repo, storage, pool }
    }

    /// Разрешение публичной страницы: слаг -> uid -> профиль.
    /// Посетитель не различает "нет такого слага" и "нет профиля" -
    /// оба случая дают один и тот же ответ.
    pub async fn public_profile(&self, slug: &str) -> Result<User, AppError> {
        let uid = self.user_repo
            .resolve_slug(slug)
            .await?
            .ok_or(AppError::ProfileNotFound)?;

        self.user_repo
            .find_by_id(uid)
            .await?
            .ok_or(AppError::ProfileNotFound)
    }

    /// Частичное обновление профиля: незаполненные поля не трогаются.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        org_name: Option<&str>,
        org_address: Option<&str>,
        show_profile: Option<bool>,
    ) -> Result<User, AppError> {
        self.user_repo
            .update_profile(&self.pool, user_id, org_name, org_address, show_profile)
            .await
    }

    // ---
    // Логотип и обложка
    // ---
    // Картинка приходит из кроппера как data-URL; ключ в хранилище
    // стабилен (один логотип на пользователя), поэтому повторная
    // загрузка просто заменяет файл.

    pub async fn upload_logo(&self, user_id: Uuid, data_url: &str) -> Result<String, AppError> {
        let url = self.storage.upload_data_url(&logo_key(user_id), data_url).await?;
        self.user_repo.set_logo_url(&self.pool, user_id, Some(&url)).await?;
        Ok(url)
    }

    pub async fn delete_logo(&self, user_id: Uuid) -> Result<(), AppError> {
        // Удаление файла - по возможности: отсутствующий объект не ошибка.
        if let Err(e) = self.storage.delete(&logo_key(user_id)).await {
            tracing::warn!("Не удалось удалить логотип из хранилища: {}", e);
        }
        self.user_repo.set_logo_url(&self.pool, user_id, None).await
    }

    pub async fn upload_cover(&self, user_id: Uuid, data_url: &str) -> Result<String, AppError> {
        let url = self.storage.upload_data_url(&cover_key(user_id), data_url).await?;
        self.user_repo.set_cover_url(&self.pool, user_id, Some(&url)).await?;
        Ok(url)
    }

    pub async fn delete_cover(&self, user_id: Uuid) -> Result<(), AppError> {
        if let Err(e) = self.storage.delete(&cover_key(user_id)).await {
            tracing::warn!("Не удалось удалить обложку из хранилища: {}", e);
        }
        self.user_repo.set_cover_url(&self.pool, user_id, None).await
    }

    /// Общая загрузка медиа для редакторов блоков и справочников:
    /// возвращает публичный URL, который клиент кладёт в нагрузку блока.
    pub async fn upload_media(
        &self,
        user_id: Uuid,
        purpose: MediaPurpose,
        data_url: &str,
    ) -> Result<String, AppError> {
        let key = media_key(purpose, user_id, Uuid::new_v4());
        self.storage.upload_data_url(&key, data_url).await
    }
}
