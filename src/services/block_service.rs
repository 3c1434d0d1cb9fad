// src/services/block_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::BlockRepository,
    models::block::{Block, BlockContent, GALLERY_MAX_IMAGES},
};

/// Чистая часть протокола перемещения: переставляет элемент `index`
/// на `index + direction` и возвращает новый порядок. Выход за границы
/// списка - не ошибка, а отсутствие перестановки (None).
pub fn plan_move<T: Clone>(list: &[T], index: usize, direction: i32) -> Option<Vec<T>> {
    let target = index as i64 + direction as i64;
    if index >= list.len() || target < 0 || target >= list.len() as i64 {
        return None;
    }

    let mut next = list.to_vec();
    let moved = next.remove(index);
    next.insert(target as usize, moved);
    Some(next)
}

#[derive(Clone)]
pub struct BlockService {
    block_repo: BlockRepository,
    pool: PgPool,
}

impl BlockService {
    pub fn new(block_repo: BlockRepository, pool: PgPool) -> Self {
        Self { block_repo, pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Block>, AppError> {
        self.block_repo.list_by_user(&self.pool, user_id).await
    }

    /// Новый блок добавляется в конец списка.
    pub async fn create(&self, user_id: Uuid, content: BlockContent) -> Result<Block, AppError> {
        validate_content(&content)?;

        let mut tx = self.pool.begin().await?;
        let position = self.block_repo.list_by_user(&mut *tx, user_id).await?.len() as i32;
        let block = self.block_repo.create(&mut *tx, user_id, position, &content).await?;
        tx.commit().await?;

        Ok(block)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        block_id: Uuid,
        content: BlockContent,
    ) -> Result<Block, AppError> {
        validate_content(&content)?;

        self.block_repo
            .update_content(&self.pool, user_id, block_id, &content)
            .await?
            .ok_or(AppError::BlockNotFound)
    }

    pub async fn delete(&self, user_id: Uuid, block_id: Uuid) -> Result<(), AppError> {
        let deleted = self.block_repo.delete(&self.pool, user_id, block_id).await?;
        if deleted == 0 {
            return Err(AppError::BlockNotFound);
        }
        Ok(())
    }

    /// Протокол перемещения блока.
    ///
    /// После перестановки позиция переназначается КАЖДОМУ блоку списка
    /// (position = индекс), и все строки пишутся в одной транзакции:
    /// коммит - новый базовый порядок, откат - хранимый порядок не
    /// изменился, клиент возвращает свой оптимистичный рендер назад.
    /// Полная перезапись, а не обмен пары значений, исключает коллизии
    /// позиций после частично неудачных записей прошлого; для списков
    /// в десятки блоков это дёшево.
    pub async fn move_block(
        &self,
        user_id: Uuid,
        block_id: Uuid,
        direction: i32,
    ) -> Result<Vec<Block>, AppError> {
        let mut tx = self.pool.begin().await?;

        let blocks = self.block_repo.list_by_user(&mut *tx, user_id).await?;
        let index = blocks
            .iter()
            .position(|b| b.id == block_id)
            .ok_or(AppError::BlockNotFound)?;

        let Some(reordered) = plan_move(&blocks, index, direction) else {
            // Первый вверх / последний вниз: порядок не меняется.
            return Ok(blocks);
        };

        for (position, block) in reordered.iter().enumerate() {
            self.block_repo
                .set_position(&mut *tx, user_id, block.id, position as i32)
                .await?;
        }

        tx.commit().await?;

        // Отдаём список с уже новыми позициями.
        let mut result = reordered;
        for (position, block) in result.iter_mut().enumerate() {
            block.position = position as i32;
        }
        Ok(result)
    }
}

// ---
// Валидация нагрузки блока
// ---

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_content(content: &BlockContent) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    match content {
        BlockContent::Gallery(gallery) => {
            if gallery.images.len() > GALLERY_MAX_IMAGES {
                return Err(AppError::GalleryLimitExceeded(GALLERY_MAX_IMAGES));
            }
        }
        BlockContent::Catalog(catalog) => {
            if catalog.products.iter().any(|p| p.price < Decimal::ZERO) {
                errors.add("products", field_error("range", "Цена товара не может быть отрицательной."));
            }
        }
        BlockContent::Bouquet(bouquet) => {
            let negative = bouquet.flowers.iter().chain(bouquet.wrappings.iter())
                .any(|f| f.price < Decimal::ZERO);
            if negative {
                errors.add("flowers", field_error("range", "Цена позиции не может быть отрицательной."));
            }
            if bouquet.delivery_options.delivery < Decimal::ZERO
                || bouquet.delivery_options.pickup < Decimal::ZERO
            {
                errors.add("deliveryOptions", field_error("range", "Стоимость доставки не может быть отрицательной."));
            }
        }
        BlockContent::Whatsapp(_) | BlockContent::Promo(_) | BlockContent::Profile(_) => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::GalleryContent;

    #[test]
    fn move_inside_bounds_lands_exactly_at_target() {
        let list = vec!['a', 'b', 'c', 'd'];

        // Для любых допустимых i и d перемещённый элемент оказывается
        // ровно на i + d, остальные сдвигаются без потерь.
        for i in 0..list.len() {
            for d in [-1i32, 1] {
                let target = i as i64 + d as i64;
                let planned = plan_move(&list, i, d);
                if target < 0 || target >= list.len() as i64 {
                    assert!(planned.is_none());
                    continue;
                }
                let next = planned.unwrap();
                assert_eq!(next[target as usize], list[i]);
                // Перестановка: те же элементы, тот же размер.
                let mut sorted = next.clone();
                sorted.sort();
                assert_eq!(sorted, list);
            }
        }
    }

    #[test]
    fn move_first_up_and_last_down_are_noops() {
        let list = vec!['a', 'b', 'c'];
        assert!(plan_move(&list, 0, -1).is_none());
        assert!(plan_move(&list, 2, 1).is_none());
    }

    #[test]
    fn move_swaps_adjacent_entries() {
        let list = vec!['a', 'b', 'c'];
        assert_eq!(plan_move(&list, 0, 1).unwrap(), vec!['b', 'a', 'c']);
        assert_eq!(plan_move(&list, 2, -1).unwrap(), vec!['a', 'c', 'b']);
    }

    #[test]
    fn move_of_unknown_index_is_rejected() {
        let list = vec!['a'];
        assert!(plan_move(&list, 5, 1).is_none());
        let empty: Vec<char> = vec![];
        assert!(plan_move(&empty, 0, 1).is_none());
    }

    #[test]
    fn gallery_is_capped_at_five_images() {
        let content = BlockContent::Gallery(GalleryContent {
            images: (0..6).map(|i| format!("https://cdn.example/{}.jpg", i)).collect(),
        });
        assert!(matches!(
            validate_content(&content),
            Err(AppError::GalleryLimitExceeded(5))
        ));

        let content = BlockContent::Gallery(GalleryContent {
            images: (0..5).map(|i| format!("https://cdn.example/{}.jpg", i)).collect(),
        });
        assert!(validate_content(&content).is_ok());
    }
}
