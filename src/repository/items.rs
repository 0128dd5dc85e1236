//! Items repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{invalid_search_pattern, ItemsStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        item::{Item, ItemFilter},
        PageRequest,
    },
};

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::boolean IS NULL OR is_active = $1)
      AND ($2::text IS NULL
           OR name ~* $2
           OR EXISTS (SELECT 1 FROM unnest(description) AS d WHERE d ~* $2))
"#;

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemsStore for ItemsRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn search(&self, filter: &ItemFilter, page: PageRequest) -> AppResult<(Vec<Item>, i64)> {
        let count_q = format!("SELECT COUNT(*) FROM items {}", FILTER_CLAUSE);
        let total = sqlx::query_scalar::<_, i64>(&count_q)
            .bind(filter.active)
            .bind(filter.search.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(invalid_search_pattern)?;

        // The sort column comes from a closed enum, never from user text
        let select_q = format!(
            "SELECT * FROM items {} ORDER BY {} {}, id LIMIT $3 OFFSET $4",
            FILTER_CLAUSE,
            filter.sort.column(),
            filter.order.as_str().to_uppercase(),
        );
        let items = sqlx::query_as::<_, Item>(&select_q)
            .bind(filter.active)
            .bind(filter.search.as_deref())
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(invalid_search_pattern)?;

        Ok((items, total))
    }

    async fn page_of_ids(&self, ids: Vec<Uuid>, page: PageRequest) -> AppResult<Vec<Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE id = ANY($1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&ids)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn create(&self, item: &Item) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, description, photo_url, qty_total, qty_available,
                is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.photo_url)
        .bind(item.qty_total)
        .bind(item.qty_available)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, item: &Item) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET
                name = $2, description = $3, photo_url = $4,
                qty_total = $5, qty_available = $6, is_active = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.photo_url)
        .bind(item.qty_total)
        .bind(item.qty_available)
        .bind(item.is_active)
        .bind(item.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Item not found".to_string()));
        }
        Ok(())
    }
}
