// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Одна позиция заказа. Состав и сумма заказа неизменяемы после
// создания - путей обновления у них просто нет.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    New,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    // Машина состояний доски заказов:
    // new -> inProgress -> completed; new|inProgress -> cancelled.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::New, OrderStatus::InProgress)
                | (OrderStatus::New, OrderStatus::Cancelled)
                | (OrderStatus::InProgress, OrderStatus::Completed)
                | (OrderStatus::InProgress, OrderStatus::Cancelled)
        )
    }

    // Следующий "рабочий" статус для кнопки на карточке заказа.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::InProgress),
            OrderStatus::InProgress => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    // Пока заказ "открыт", персонал может менять флориста и статус.
    pub fn is_open(self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::InProgress)
    }

    pub fn title_ru(self) -> &'static str {
        match self {
            OrderStatus::New => "Новый",
            OrderStatus::InProgress => "В работе",
            OrderStatus::Completed => "Выполнен",
            OrderStatus::Cancelled => "Отменен",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::InProgress => "inProgress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(json)]
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    // Только цифры: номер нормализуется при создании заказа.
    pub customer_phone: String,
    pub status: OrderStatus,
    pub florist_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Запись журнала смены статусов. Журнал только дописывается.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChange {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Florist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// --- Статистика для вкладки "Статистика" ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FloristScore {
    pub name: String,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HubStats {
    pub total: i64,
    pub completed: i64,
    pub cancelled_rate: String,
    pub florists: Vec<FloristScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_machine_allows_only_forward_and_cancel() {
        use OrderStatus::*;

        assert!(New.can_transition_to(InProgress));
        assert!(New.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));

        // Нельзя перескочить или вернуться назад.
        assert!(!New.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(New));
        assert!(!Completed.can_transition_to(New));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(InProgress));
        assert!(!New.can_transition_to(New));
    }

    #[test]
    fn terminal_statuses_have_no_next() {
        assert_eq!(OrderStatus::New.next(), Some(OrderStatus::InProgress));
        assert_eq!(OrderStatus::InProgress.next(), Some(OrderStatus::Completed));
        assert_eq!(OrderStatus::Completed.next(), None);
        assert_eq!(OrderStatus::Cancelled.next(), None);
    }

    #[test]
    fn open_statuses() {
        assert!(OrderStatus::New.is_open());
        assert!(OrderStatus::InProgress.is_open());
        assert!(!OrderStatus::Completed.is_open());
        assert!(!OrderStatus::Cancelled.is_open());
    }
}
