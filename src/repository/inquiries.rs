//! Inquiries repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{conflict_on_unique, InquiriesStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        inquiry::{Inquiry, InquiryReply, InquiryStats, StatusCount},
        PageRequest,
    },
};

#[derive(Clone)]
pub struct InquiriesRepository {
    pool: Pool<Postgres>,
}

impl InquiriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn not_found() -> AppError {
        AppError::NotFound("Inquiry not found".to_string())
    }
}

#[async_trait]
impl InquiriesStore for InquiriesRepository {
    async fn create_pending(&self, inquiry: &Inquiry) -> AppResult<()> {
        // inquiries_one_pending_per_user_item rejects a second pending row
        sqlx::query(
            r#"
            INSERT INTO inquiries (
                id, item_id, item_name, item_photo_url, user_id, user_name,
                user_message, status, admin_reply, is_read, is_read_by_admin,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', '', FALSE, FALSE, $8, $9)
            "#,
        )
        .bind(inquiry.id)
        .bind(inquiry.item_id)
        .bind(&inquiry.item_name)
        .bind(&inquiry.item_photo_url)
        .bind(inquiry.user_id)
        .bind(&inquiry.user_name)
        .bind(&inquiry.user_message)
        .bind(inquiry.created_at)
        .bind(inquiry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(e, |_| {
                "You already have a pending inquiry for this item".to_string()
            })
        })?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Inquiry> {
        sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(Self::not_found)
    }

    async fn list(&self, user_id: Option<Uuid>, page: PageRequest) -> AppResult<(Vec<Inquiry>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inquiries WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT * FROM inquiries
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn apply_reply(&self, id: Uuid, reply: &InquiryReply) -> AppResult<Inquiry> {
        let updated = sqlx::query_as::<_, Inquiry>(
            r#"
            UPDATE inquiries SET
                admin_reply = $2,
                status = $3,
                replied_by = $4,
                replied_at = $5,
                is_read_by_admin = TRUE,
                updated_at = $5
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&reply.admin_reply)
        .bind(reply.status)
        .bind(reply.replied_by)
        .bind(reply.replied_at)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(inquiry) => Ok(inquiry),
            None => {
                self.get_by_id(id).await?;
                Err(AppError::InvalidState(
                    "This inquiry has already been replied to".to_string(),
                ))
            }
        }
    }

    async fn mark_read_by_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Inquiry> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            UPDATE inquiries SET is_read = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(Self::not_found)
    }

    async fn mark_read_by_admin(&self, id: Uuid) -> AppResult<Inquiry> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            UPDATE inquiries SET is_read_by_admin = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(Self::not_found)
    }

    async fn stats(&self) -> AppResult<InquiryStats> {
        let by_status = sqlx::query_as::<_, (crate::models::InquiryStatus, i64)>(
            "SELECT status, COUNT(*) FROM inquiries GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();

        let (total, unread_by_admin): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE NOT is_read_by_admin)
            FROM inquiries
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(InquiryStats {
            total,
            unread_by_admin,
            by_status,
        })
    }
}
