// src/services/storage.rs

use aws_sdk_s3::Client as S3Client;
use base64::Engine;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::directory::DirectoryKind;

// Назначение загрузки определяет пространство ключей в бакете.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MediaPurpose {
    // Карточки товаров каталога
    Product,
    // Галерея блока
    Gallery,
    // Справочники (только администратор)
    Flowers,
    Wrappings,
}

impl MediaPurpose {
    pub fn is_admin_only(self) -> bool {
        matches!(self, MediaPurpose::Flowers | MediaPurpose::Wrappings)
    }
}

// ---
// Ключи бакета
// ---
// Пути разделены по пользователю и назначению, как и папки
// в хранилище: logos/, covers/, products/{uid}/, gallery/{uid}/,
// directories/{collection}/.

pub fn logo_key(user_id: Uuid) -> String {
    format!("logos/{}", user_id)
}

pub fn cover_key(user_id: Uuid) -> String {
    format!("covers/{}", user_id)
}

pub fn media_key(purpose: MediaPurpose, user_id: Uuid, file_id: Uuid) -> String {
    match purpose {
        MediaPurpose::Product => format!("products/{}/{}", user_id, file_id),
        MediaPurpose::Gallery => format!("gallery/{}/{}", user_id, file_id),
        MediaPurpose::Flowers => format!("directories/{}/{}", directory_segment(DirectoryKind::Flower), file_id),
        MediaPurpose::Wrappings => format!("directories/{}/{}", directory_segment(DirectoryKind::Wrapping), file_id),
    }
}

fn directory_segment(kind: DirectoryKind) -> &'static str {
    match kind {
        DirectoryKind::Flower => "flowers",
        DirectoryKind::Wrapping => "wrappings",
    }
}

/// Разбирает data-URL ("data:image/png;base64,...") на MIME-тип и байты.
pub fn parse_data_url(data_url: &str) -> Option<(String, Vec<u8>)> {
    let rest = data_url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}

// Объектное хранилище. Ключ стабилен, публичный URL строится
// от базового адреса бакета.
#[derive(Clone)]
pub struct ObjectStorage {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl ObjectStorage {
    pub fn new(client: S3Client, bucket: String, public_base_url: String) -> Self {
        let public_base_url = public_base_url.trim_end_matches('/').to_string();
        Self { client, bucket, public_base_url }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    pub async fn upload_bytes(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(bytes.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(key = %key, "Ошибка загрузки в хранилище: {}", e);
                AppError::StorageError(e.to_string())
            })?;

        Ok(self.public_url(key))
    }

    /// Загружает картинку, пришедшую из кроппера как data-URL,
    /// и возвращает её публичный URL.
    pub async fn upload_data_url(&self, key: &str, data_url: &str) -> Result<String, AppError> {
        let (mime, bytes) = parse_data_url(data_url).ok_or(AppError::InvalidImageData)?;
        if !mime.starts_with("image/") {
            return Err(AppError::InvalidImageData);
        }
        self.upload_bytes(key, bytes, &mime).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(key = %key, "Ошибка удаления из хранилища: {}", e);
                AppError::StorageError(e.to_string())
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_user_and_purpose() {
        let uid = Uuid::nil();
        let fid = Uuid::nil();
        assert_eq!(logo_key(uid), format!("logos/{}", uid));
        assert_eq!(cover_key(uid), format!("covers/{}", uid));
        assert_eq!(media_key(MediaPurpose::Product, uid, fid), format!("products/{}/{}", uid, fid));
        assert_eq!(media_key(MediaPurpose::Gallery, uid, fid), format!("gallery/{}/{}", uid, fid));
        assert_eq!(media_key(MediaPurpose::Flowers, uid, fid), format!("directories/flowers/{}", fid));
        assert_eq!(media_key(MediaPurpose::Wrappings, uid, fid), format!("directories/wrappings/{}", fid));
    }

    #[test]
    fn data_url_parses_mime_and_payload() {
        // "hi" в base64
        let (mime, bytes) = parse_data_url("data:image/png;base64,aGk=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"hi");
    }

    #[test]
    fn malformed_data_url_is_rejected() {
        assert!(parse_data_url("image/png;base64,aGk=").is_none());
        assert!(parse_data_url("data:image/png,aGk=").is_none());
        assert!(parse_data_url("data:image/png;base64,===bad===").is_none());
    }
}
