// src/models/directory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Вид справочника: цветы или упаковки.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "directory_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DirectoryKind {
    Flower,
    Wrapping,
}

impl DirectoryKind {
    // Сегмент пути в API: /api/admin/directories/{kind}
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "flowers" => Some(DirectoryKind::Flower),
            "wrappings" => Some(DirectoryKind::Wrapping),
            _ => None,
        }
    }
}

// Позиция глобального справочника. Ведёт администратор; блоки копируют
// цену в момент выбора, поэтому правка справочника не трогает уже
// настроенные блоки.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryItem {
    pub id: Uuid,
    pub kind: DirectoryKind,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_from_path_segment() {
        assert_eq!(DirectoryKind::from_path("flowers"), Some(DirectoryKind::Flower));
        assert_eq!(DirectoryKind::from_path("wrappings"), Some(DirectoryKind::Wrapping));
        assert_eq!(DirectoryKind::from_path("ribbons"), None);
    }
}
