// src/models/block.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Максимум изображений в блоке-галерее.
pub const GALLERY_MAX_IMAGES: usize = 5;

// --- Нагрузка по типам блоков ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhatsappContent {
    pub number: String,
    pub label: String,
    pub color: String,
    // Используется, когда кнопка ведёт на произвольный URL,
    // а не на номер телефона.
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CatalogLayout {
    Grid,
    Scroll,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogContent {
    pub title: String,
    pub whatsapp_number: String,
    pub layout: CatalogLayout,
    pub button_color: String,
    pub products: Vec<CatalogProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryContent {
    // Клиент листает изображения каждые 5 секунд; лимит
    // количества проверяется при сохранении блока.
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoContent {
    pub text: String,
    pub expires_at: DateTime<Utc>,
    pub link: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileContent {
    pub org_name: String,
    pub org_address: String,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
}

// Позиция ассортимента внутри блока-конструктора: цена скопирована
// из справочника в момент выбора и дальше живёт своей жизнью.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowerOption {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOptions {
    pub delivery: Decimal,
    pub pickup: Decimal,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self { delivery: Decimal::from(2500), pickup: Decimal::ZERO }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BouquetContent {
    pub flowers: Vec<FlowerOption>,
    pub wrappings: Vec<FlowerOption>,
    pub whatsapp_number: String,
    #[serde(default)]
    pub delivery_options: DeliveryOptions,
}

impl BouquetContent {
    pub fn flower(&self, id: &str) -> Option<&FlowerOption> {
        self.flowers.iter().find(|f| f.id == id)
    }

    pub fn wrapping(&self, id: &str) -> Option<&FlowerOption> {
        self.wrappings.iter().find(|w| w.id == id)
    }
}

// --- Блок как размеченное объединение ---
// Дискриминатор "type" хранится прямо в JSONB-нагрузке, поэтому
// рендеринг - это исчерпывающий match, а неизвестный тип - ошибка
// десериализации, а не молчаливый пропуск.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockContent {
    Whatsapp(WhatsappContent),
    Catalog(CatalogContent),
    Gallery(GalleryContent),
    Promo(PromoContent),
    Profile(ProfileContent),
    Bouquet(BouquetContent),
}

impl BlockContent {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockContent::Whatsapp(_) => "whatsapp",
            BlockContent::Catalog(_) => "catalog",
            BlockContent::Gallery(_) => "gallery",
            BlockContent::Promo(_) => "promo",
            BlockContent::Profile(_) => "profile",
            BlockContent::Bouquet(_) => "bouquet",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: Uuid,
    pub user_id: Uuid,
    // Порядок отображения; при каждом перемещении переназначается
    // для всего списка (0..n), а не только для пары соседей.
    pub position: i32,
    #[sqlx(json)]
    pub content: BlockContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Обратный отсчёт акции ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    // Меньше часа до конца
    LastHour,
    // Меньше пяти минут; имеет приоритет над LastHour
    LastMinutes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Countdown {
    Expired,
    Active { hours: i64, minutes: i64, seconds: i64, urgency: Urgency },
}

impl PromoContent {
    /// Чистое производное состояние: сколько осталось до конца акции
    /// на момент `now`. Тикает клиент, сервер лишь делает снимок.
    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        let diff = self.expires_at - now;
        if diff.num_seconds() <= 0 {
            return Countdown::Expired;
        }

        let urgency = if diff.num_minutes() < 5 {
            Urgency::LastMinutes
        } else if diff.num_hours() < 1 {
            Urgency::LastHour
        } else {
            Urgency::Calm
        };

        Countdown::Active {
            hours: diff.num_hours() % 24,
            minutes: diff.num_minutes() % 60,
            seconds: diff.num_seconds() % 60,
            urgency,
        }
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Countdown::Expired => write!(f, "Акция завершена"),
            Countdown::Active { hours, minutes, seconds, urgency } => {
                let prefix = match urgency {
                    Urgency::Calm => "",
                    Urgency::LastHour => "🔥 ",
                    Urgency::LastMinutes => "⏰ ",
                };
                write!(f, "{}{}ч {}м {}с", prefix, hours, minutes, seconds)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn promo(expires_at: DateTime<Utc>) -> PromoContent {
        PromoContent {
            text: "Скидка 20% на все букеты".to_string(),
            expires_at,
            link: None,
            color: "yellow".to_string(),
        }
    }

    #[test]
    fn countdown_expired_when_deadline_passed() {
        let now = Utc.with_ymd_and_hms(2025, 6, 12, 12, 0, 0).unwrap();
        let p = promo(now - chrono::Duration::seconds(1));
        assert_eq!(p.countdown(now), Countdown::Expired);
        assert_eq!(p.countdown(now).to_string(), "Акция завершена");

        // Ровно в момент дедлайна акция уже считается завершённой.
        let p = promo(now);
        assert_eq!(p.countdown(now), Countdown::Expired);
    }

    #[test]
    fn countdown_urgency_thresholds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 12, 12, 0, 0).unwrap();

        let p = promo(now + chrono::Duration::hours(2));
        assert!(matches!(p.countdown(now), Countdown::Active { urgency: Urgency::Calm, .. }));

        let p = promo(now + chrono::Duration::minutes(59));
        assert!(matches!(p.countdown(now), Countdown::Active { urgency: Urgency::LastHour, .. }));

        // Меньше пяти минут перекрывает "меньше часа".
        let p = promo(now + chrono::Duration::minutes(4));
        let c = p.countdown(now);
        assert!(matches!(c, Countdown::Active { urgency: Urgency::LastMinutes, .. }));
        assert!(c.to_string().starts_with("⏰ "));
    }

    #[test]
    fn countdown_splits_remaining_time() {
        let now = Utc.with_ymd_and_hms(2025, 6, 12, 12, 0, 0).unwrap();
        let p = promo(now + chrono::Duration::hours(3) + chrono::Duration::minutes(25) + chrono::Duration::seconds(40));
        match p.countdown(now) {
            Countdown::Active { hours, minutes, seconds, .. } => {
                assert_eq!((hours, minutes, seconds), (3, 25, 40));
            }
            other => panic!("неожиданное состояние: {:?}", other),
        }
    }

    #[test]
    fn block_content_discriminated_by_type_field() {
        let raw = serde_json::json!({
            "type": "bouquet",
            "flowers": [{ "id": "roses", "name": "Розы", "price": 300.0, "imageUrl": null }],
            "wrappings": [],
            "whatsappNumber": "+7 701 123 45 67"
        });
        let content: BlockContent = serde_json::from_value(raw).unwrap();
        match &content {
            BlockContent::Bouquet(b) => {
                assert_eq!(b.flowers[0].id, "roses");
                // deliveryOptions отсутствует в старых блоках - подставляется по умолчанию
                assert_eq!(b.delivery_options.pickup, Decimal::ZERO);
            }
            other => panic!("неожиданный тип блока: {:?}", other),
        }
        assert_eq!(content.kind(), "bouquet");
    }

    #[test]
    fn unknown_block_type_is_a_deserialization_error() {
        let raw = serde_json::json!({ "type": "marquee", "text": "..." });
        assert!(serde_json::from_value::<BlockContent>(raw).is_err());
    }
}
