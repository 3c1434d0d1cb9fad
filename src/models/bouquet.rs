// src/models/bouquet.rs

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::block::{BouquetContent, FlowerOption};
use crate::models::order::OrderItem;

// ID цветов, для которых доступны кнопки быстрого набора (51/101 шт).
pub const QUICK_ADD_FLOWER_IDS: [&str; 2] = ["roses", "euro"];

// Подпись позиции, id которой не нашёлся в ассортименте блока.
pub const UNKNOWN_FLOWER_NAME: &str = "Неизвестный цветок";

pub fn is_quick_add(flower_id: &str) -> bool {
    QUICK_ADD_FLOWER_IDS.contains(&flower_id)
}

/// Выбор покупателя в конструкторе букета: id цветка -> количество.
///
/// Живёт только в рамках одного оформления заказа и никогда не
/// сохраняется. Нулевые количества не хранятся: уменьшение до нуля
/// удаляет ключ целиком.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    counts: HashMap<String, u32>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    // Строит выбор из "сырой" карты клиента, отбрасывая нулевые записи.
    pub fn from_map(map: HashMap<String, u32>) -> Self {
        let counts = map.into_iter().filter(|(_, qty)| *qty > 0).collect();
        Self { counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn quantity(&self, flower_id: &str) -> u32 {
        self.counts.get(flower_id).copied().unwrap_or(0)
    }

    pub fn increase(&mut self, flower_id: &str) {
        *self.counts.entry(flower_id.to_string()).or_insert(0) += 1;
    }

    pub fn decrease(&mut self, flower_id: &str) {
        match self.counts.get_mut(flower_id) {
            Some(qty) if *qty > 1 => *qty -= 1,
            Some(_) => {
                self.counts.remove(flower_id);
            }
            None => {}
        }
    }

    // Прямая установка количества (кнопки "51 шт" / "101 шт").
    // Последняя запись побеждает; ноль удаляет ключ.
    pub fn set_quantity(&mut self, flower_id: &str, quantity: u32) {
        if quantity == 0 {
            self.counts.remove(flower_id);
        } else {
            self.counts.insert(flower_id.to_string(), quantity);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, qty)| (id.as_str(), *qty))
    }
}

/// Итог расчёта: позиции заказа и общая сумма.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

/// Считает состав и сумму букета по выбору покупателя.
///
/// Позиции идут в порядке ассортимента блока; id, которых в блоке нет,
/// добавляются в конец с подписью-заглушкой и нулевой ценой. Упаковка,
/// если выбрана, добавляется последней строкой с количеством 1.
pub fn price_quote(
    selection: &Selection,
    bouquet: &BouquetContent,
    wrapping: Option<&FlowerOption>,
) -> PriceQuote {
    let mut items = Vec::new();
    let mut total = Decimal::ZERO;

    for flower in &bouquet.flowers {
        let qty = selection.quantity(&flower.id);
        if qty == 0 {
            continue;
        }
        total += flower.price * Decimal::from(qty);
        items.push(OrderItem {
            name: flower.name.clone(),
            quantity: qty as i32,
            price: flower.price,
        });
    }

    // Выбранные id, которых нет в ассортименте блока.
    let mut unknown: Vec<(&str, u32)> = selection
        .iter()
        .filter(|(id, _)| bouquet.flower(id).is_none())
        .collect();
    unknown.sort_by_key(|(id, _)| *id);
    for (_, qty) in unknown {
        items.push(OrderItem {
            name: UNKNOWN_FLOWER_NAME.to_string(),
            quantity: qty as i32,
            price: Decimal::ZERO,
        });
    }

    if let Some(w) = wrapping {
        total += w.price;
        items.push(OrderItem {
            name: w.name.clone(),
            quantity: 1,
            price: w.price,
        });
    }

    PriceQuote { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::DeliveryOptions;

    fn flower(id: &str, name: &str, price: i64) -> FlowerOption {
        FlowerOption {
            id: id.to_string(),
            name: name.to_string(),
            price: Decimal::from(price),
            image_url: None,
        }
    }

    fn bouquet() -> BouquetContent {
        BouquetContent {
            flowers: vec![flower("roses", "Roses", 300), flower("euro", "Белая роза", 400)],
            wrappings: vec![flower("w1", "Крафт", 500)],
            whatsapp_number: "+7 (701) 123-45-67".to_string(),
            delivery_options: DeliveryOptions::default(),
        }
    }

    #[test]
    fn selection_never_holds_zero_or_negative_quantities() {
        let mut s = Selection::new();
        s.increase("roses");
        s.increase("roses");
        s.decrease("roses");
        s.decrease("roses");
        // Количество дошло до нуля - ключа больше нет.
        assert_eq!(s.quantity("roses"), 0);
        assert!(s.is_empty());

        // Уменьшение несуществующего id ничего не ломает.
        s.decrease("roses");
        assert!(s.is_empty());

        // Любая последовательность операций не оставляет нулевых записей.
        s.increase("euro");
        s.set_quantity("euro", 0);
        assert!(s.iter().all(|(_, qty)| qty > 0));
        assert!(s.is_empty());
    }

    #[test]
    fn from_map_drops_zero_entries() {
        let mut raw = HashMap::new();
        raw.insert("roses".to_string(), 3u32);
        raw.insert("euro".to_string(), 0u32);
        let s = Selection::from_map(raw);
        assert_eq!(s.quantity("roses"), 3);
        assert_eq!(s.quantity("euro"), 0);
        assert!(s.iter().all(|(_, qty)| qty > 0));
    }

    #[test]
    fn set_quantity_is_last_write_wins() {
        let mut s = Selection::new();
        s.set_quantity("roses", 51);
        s.set_quantity("roses", 101);
        // Никакого накопления: 51 + 101 было бы ошибкой.
        assert_eq!(s.quantity("roses"), 101);
    }

    #[test]
    fn empty_selection_costs_nothing() {
        let q = price_quote(&Selection::new(), &bouquet(), None);
        assert!(q.items.is_empty());
        assert_eq!(q.total, Decimal::ZERO);
    }

    #[test]
    fn total_is_sum_of_prices_plus_wrapping() {
        let b = bouquet();
        let mut s = Selection::new();
        s.set_quantity("roses", 3);

        let wrapping = b.wrapping("w1").cloned();
        let q = price_quote(&s, &b, wrapping.as_ref());

        // 3 * 300 + 500 = 1400
        assert_eq!(q.total, Decimal::from(1400));
        assert_eq!(
            q.items,
            vec![
                OrderItem { name: "Roses".to_string(), quantity: 3, price: Decimal::from(300) },
                OrderItem { name: "Крафт".to_string(), quantity: 1, price: Decimal::from(500) },
            ]
        );
    }

    #[test]
    fn wrapping_alone_is_a_valid_quote() {
        let b = bouquet();
        let q = price_quote(&Selection::new(), &b, b.wrapping("w1"));
        assert_eq!(q.total, Decimal::from(500));
        assert_eq!(q.items.len(), 1);
    }

    #[test]
    fn unknown_flower_id_becomes_placeholder_with_zero_price() {
        let b = bouquet();
        let mut s = Selection::new();
        s.set_quantity("orchid", 2);
        let q = price_quote(&s, &b, None);
        assert_eq!(q.total, Decimal::ZERO);
        assert_eq!(q.items[0].name, UNKNOWN_FLOWER_NAME);
        assert_eq!(q.items[0].quantity, 2);
    }

    #[test]
    fn quick_add_applies_to_designated_ids_only() {
        assert!(is_quick_add("roses"));
        assert!(is_quick_add("euro"));
        assert!(!is_quick_add("w1"));
        assert!(!is_quick_add("orchid"));
    }
}
