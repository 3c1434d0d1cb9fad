// src/services/order_service.rs

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BlockRepository, OrderRepository},
    models::{
        block::BlockContent,
        bouquet::{price_quote, PriceQuote, Selection},
        order::{Florist, HubStats, Order, OrderItem, OrderStatus, OrderStatusChange},
    },
};

const BOUQUET_GREETING: &str = "Здравствуйте! Хочу заказать букет:";
const PRODUCT_GREETING: &str = "Здравствуйте! Хочу заказать:";

// Всё, кроме букв/цифр и -_.~, кодируется - как encodeURIComponent.
const MESSAGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Номер для wa.me: остаются только цифры.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Текст сообщения для чата. Переводы строк и знак валюты - буквально,
/// кодирование происходит только при сборке ссылки.
pub fn compose_message(greeting: &str, items: &[OrderItem], total: Decimal) -> String {
    let mut message = format!("{}\n\n", greeting);
    for item in items {
        message.push_str(&format!("- {} × {}\n", item.name, item.quantity));
    }
    message.push_str(&format!("\n*Итого: {} ₸*", total.normalize()));
    message
}

/// Глубокая ссылка https://wa.me/{цифры}?text={закодированный текст}.
pub fn whatsapp_link(phone_digits: &str, message: &str) -> String {
    let encoded = utf8_percent_encode(message, MESSAGE_ENCODE_SET);
    format!("https://wa.me/{}?text={}", phone_digits, encoded)
}

// ---
// Защита от двойной отправки
// ---
// Ключ (владелец/блок/товар) занят, пока первый запрос не завершился;
// заказы ДРУГИХ товаров при этом не блокируются.

#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

pub struct InFlightLease {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlight {
    pub fn try_acquire(&self, key: &str) -> Option<InFlightLease> {
        let mut keys = self.keys.lock().expect("отравленный мьютекс in-flight ключей");
        if !keys.insert(key.to_string()) {
            return None;
        }
        Some(InFlightLease { keys: Arc::clone(&self.keys), key: key.to_string() })
    }
}

impl Drop for InFlightLease {
    fn drop(&mut self) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.remove(&self.key);
        }
    }
}

// ---
// Результат оформления заказа
// ---
// Ссылка строится ДО записи в базу и возвращается всегда; исход записи
// наблюдаем через `persisted`/`order_id`, а не теряется в фоне.

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub whatsapp_link: String,
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub order_id: Option<Uuid>,
    pub persisted: bool,
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    block_repo: BlockRepository,
    pool: PgPool,
    in_flight: InFlight,
}

impl OrderService {
    pub fn new(order_repo: OrderRepository, block_repo: BlockRepository, pool: PgPool) -> Self {
        Self { order_repo, block_repo, pool, in_flight: InFlight::default() }
    }

    // ---
    // Оформление заказов покупателем
    // ---

    /// Заказ букета из конструктора.
    ///
    /// Валидация (пустой выбор, отсутствующий номер) отсекает запрос до
    /// любых побочных эффектов. Дальше ссылка для чата формируется
    /// первой: конверсия в переписку не должна зависеть от задержек или
    /// отказов базы. Неудачная запись заказа логируется и отражается во
    /// флаге `persisted`, но запрос не роняет.
    pub async fn submit_bouquet_order(
        &self,
        owner_id: Uuid,
        block_id: Uuid,
        selection_map: HashMap<String, u32>,
        wrapping_id: Option<String>,
    ) -> Result<OrderSubmission, AppError> {
        let block = self.block_repo
            .get(owner_id, block_id)
            .await?
            .ok_or(AppError::BlockNotFound)?;

        let BlockContent::Bouquet(bouquet) = &block.content else {
            return Err(AppError::BlockNotFound);
        };

        if bouquet.whatsapp_number.trim().is_empty() {
            return Err(AppError::WhatsappNumberMissing);
        }

        let selection = Selection::from_map(selection_map);
        if selection.is_empty() {
            return Err(AppError::EmptySelection);
        }

        let wrapping = match &wrapping_id {
            Some(id) => {
                let found = bouquet.wrapping(id);
                if found.is_none() {
                    // Упаковку могли убрать из блока между рендером и заказом;
                    // заказ не блокируем, просто считаем без неё.
                    tracing::warn!(wrapping_id = %id, "Выбранная упаковка не найдена в блоке");
                }
                found
            }
            None => None,
        };

        let quote = price_quote(&selection, bouquet, wrapping);
        let phone = normalize_phone(&bouquet.whatsapp_number);
        let message = compose_message(BOUQUET_GREETING, &quote.items, quote.total);
        let link = whatsapp_link(&phone, &message);

        Ok(self.persist_best_effort(owner_id, quote, phone, link).await)
    }

    /// Заказ одного товара из каталога (кнопка "Купить").
    pub async fn submit_product_order(
        &self,
        owner_id: Uuid,
        block_id: Uuid,
        product_index: usize,
    ) -> Result<OrderSubmission, AppError> {
        let block = self.block_repo
            .get(owner_id, block_id)
            .await?
            .ok_or(AppError::BlockNotFound)?;

        let BlockContent::Catalog(catalog) = &block.content else {
            return Err(AppError::BlockNotFound);
        };

        if catalog.whatsapp_number.trim().is_empty() {
            return Err(AppError::WhatsappNumberMissing);
        }

        let product = catalog.products.get(product_index).ok_or(AppError::ProductNotFound)?;

        // Замок на конкретный товар: двойной клик по той же карточке
        // отклоняется, пока первый заказ не завершился.
        let key = format!("{}:{}:{}", owner_id, block_id, product_index);
        let _lease = self.in_flight.try_acquire(&key).ok_or(AppError::SubmissionInFlight)?;

        let quote = PriceQuote {
            items: vec![OrderItem {
                name: product.name.clone(),
                quantity: 1,
                price: product.price,
            }],
            total: product.price,
        };
        let phone = normalize_phone(&catalog.whatsapp_number);
        let message = compose_message(PRODUCT_GREETING, &quote.items, quote.total);
        let link = whatsapp_link(&phone, &message);

        Ok(self.persist_best_effort(owner_id, quote, phone, link).await)
    }

    // Запись заказа "по возможности": ссылка уже готова, ошибка базы
    // не должна отменить действие, видимое покупателю.
    async fn persist_best_effort(
        &self,
        owner_id: Uuid,
        quote: PriceQuote,
        phone: String,
        link: String,
    ) -> OrderSubmission {
        match self.order_repo
            .create(&self.pool, owner_id, &quote.items, quote.total, &phone)
            .await
        {
            Ok(order) => OrderSubmission {
                whatsapp_link: link,
                items: quote.items,
                total_price: quote.total,
                order_id: Some(order.id),
                persisted: true,
            },
            Err(e) => {
                tracing::error!("Ошибка при создании заказа в фоне: {}", e);
                OrderSubmission {
                    whatsapp_link: link,
                    items: quote.items,
                    total_price: quote.total,
                    order_id: None,
                    persisted: false,
                }
            }
        }
    }

    // ---
    // Доска заказов (центр управления)
    // ---

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Order>, AppError> {
        self.order_repo.list_by_user(owner_id).await
    }

    /// Смена статуса: проверка машины состояний, обновление и запись в
    /// журнал истории - одной транзакцией.
    pub async fn change_status(
        &self,
        owner_id: Uuid,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self.order_repo
            .get(&mut *tx, owner_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if !order.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: order.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }

        let updated = self.order_repo.set_status(&mut *tx, owner_id, order_id, next).await?;
        self.order_repo.append_history(&mut *tx, order_id, next).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Назначение флориста возможно, только пока заказ открыт.
    pub async fn assign_florist(
        &self,
        owner_id: Uuid,
        order_id: Uuid,
        florist_name: Option<&str>,
    ) -> Result<Order, AppError> {
        let order = self.order_repo
            .get(&self.pool, owner_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if !order.status.is_open() {
            return Err(AppError::OrderClosed);
        }

        self.order_repo.set_florist(&self.pool, owner_id, order_id, florist_name).await
    }

    pub async fn update_notes(
        &self,
        owner_id: Uuid,
        order_id: Uuid,
        notes: &str,
    ) -> Result<Order, AppError> {
        self.order_repo
            .get(&self.pool, owner_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        self.order_repo.set_notes(&self.pool, owner_id, order_id, notes).await
    }

    pub async fn history(
        &self,
        owner_id: Uuid,
        order_id: Uuid,
    ) -> Result<Vec<OrderStatusChange>, AppError> {
        // Журнал отдаём только владельцу заказа.
        self.order_repo
            .get(&self.pool, owner_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        self.order_repo.list_history(order_id).await
    }

    // ---
    // Флористы
    // ---

    pub async fn list_florists(&self, owner_id: Uuid) -> Result<Vec<Florist>, AppError> {
        self.order_repo.list_florists(owner_id).await
    }

    pub async fn add_florist(&self, owner_id: Uuid, name: &str) -> Result<Florist, AppError> {
        self.order_repo.create_florist(&self.pool, owner_id, name.trim()).await
    }

    // ---
    // Статистика
    // ---

    pub async fn stats(&self, owner_id: Uuid) -> Result<HubStats, AppError> {
        let counts = self.order_repo.status_counts(owner_id).await?;
        let total: i64 = counts.iter().map(|(_, n)| n).sum();
        let count_of = |status: OrderStatus| {
            counts.iter().find(|(s, _)| *s == status).map(|(_, n)| *n).unwrap_or(0)
        };

        let completed = count_of(OrderStatus::Completed);
        let cancelled = count_of(OrderStatus::Cancelled);
        let cancelled_rate = if total > 0 {
            format!("{}%", ((cancelled as f64 / total as f64) * 100.0).round() as i64)
        } else {
            "0%".to_string()
        };

        let florists = self.order_repo.florist_leaderboard(owner_id).await?;

        Ok(HubStats { total, completed, cancelled_rate, florists })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_is_stripped_to_digits() {
        assert_eq!(normalize_phone("+7 (701) 123-45-67"), "77011234567");
        assert_eq!(normalize_phone("8-700-000-00-00"), "87000000000");
        assert_eq!(normalize_phone("wa: нет"), "");
    }

    #[test]
    fn message_matches_chat_format() {
        let items = vec![
            OrderItem { name: "Roses".into(), quantity: 3, price: Decimal::from(300) },
            OrderItem { name: "Крафт".into(), quantity: 1, price: Decimal::from(500) },
        ];
        let message = compose_message(BOUQUET_GREETING, &items, Decimal::from(1400));
        assert_eq!(
            message,
            "Здравствуйте! Хочу заказать букет:\n\n- Roses × 3\n- Крафт × 1\n\n*Итого: 1400 ₸*"
        );
    }

    #[test]
    fn link_encodes_message_preserving_newlines_and_currency() {
        let link = whatsapp_link("77011234567", "a b\n*Итого: 100 ₸*");
        assert!(link.starts_with("https://wa.me/77011234567?text="));
        // Перевод строки и тенге переживают кодирование.
        assert!(link.contains("%0A"));
        assert!(link.contains("%E2%82%B8"));
        // Пробел не превращается в '+'.
        assert!(link.contains("a%20b"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn totals_are_printed_without_trailing_zeros() {
        let items = vec![OrderItem { name: "Пион".into(), quantity: 1, price: Decimal::new(140000, 2) }];
        let message = compose_message(PRODUCT_GREETING, &items, Decimal::new(140000, 2));
        assert!(message.ends_with("*Итого: 1400 ₸*"));
    }

    #[test]
    fn in_flight_guard_is_keyed_per_product() {
        let guard = InFlight::default();

        let lease_a = guard.try_acquire("u:b:0").expect("первый захват ключа");
        // Повторный заказ того же товара отклоняется...
        assert!(guard.try_acquire("u:b:0").is_none());
        // ...а другой товар - нет.
        let lease_b = guard.try_acquire("u:b:1");
        assert!(lease_b.is_some());

        // После завершения первого запроса ключ снова свободен.
        drop(lease_a);
        assert!(guard.try_acquire("u:b:0").is_some());
    }
}
