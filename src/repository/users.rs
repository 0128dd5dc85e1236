//! Users repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{conflict_on_unique, UsersStore};
use crate::{
    error::{AppError, AppResult},
    models::user::{ApprovalStatus, User},
};

fn duplicate_user_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_username_key") => "Username already exists".to_string(),
        _ => "Email already exists".to_string(),
    }
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersStore for UsersRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn list(&self, approval_status: Option<ApprovalStatus>) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NULL OR approval_status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(approval_status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, age, gender, contact_number,
                email, username, password_hash, address,
                role, approval_status, is_active, wishlist,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.age)
        .bind(&user.gender)
        .bind(&user.contact_number)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.address)
        .bind(user.role)
        .bind(user.approval_status)
        .bind(user.is_active)
        .bind(&user.wishlist)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, duplicate_user_message))?;
        Ok(())
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                first_name = $2, last_name = $3, age = $4, gender = $5,
                contact_number = $6, email = $7, username = $8,
                password_hash = $9, address = $10, role = $11,
                is_active = $12, updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.age)
        .bind(&user.gender)
        .bind(&user.contact_number)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.address)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, duplicate_user_message))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn decide_approval(&self, id: Uuid, status: ApprovalStatus) -> AppResult<User> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET approval_status = $2, updated_at = $3
            WHERE id = $1 AND approval_status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(user) => Ok(user),
            None => {
                // Distinguish a missing user from one already decided
                self.get_by_id(id).await?;
                Err(AppError::InvalidState("User is not pending approval".to_string()))
            }
        }
    }

    async fn wishlist_add(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Vec<Uuid>> {
        let wishlist: Option<Vec<Uuid>> = sqlx::query_scalar(
            r#"
            UPDATE users SET wishlist = array_append(wishlist, $2), updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(wishlist))
            RETURNING wishlist
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        match wishlist {
            Some(wishlist) => Ok(wishlist),
            None => {
                self.get_by_id(user_id).await?;
                Err(AppError::Conflict("Item already in wishlist".to_string()))
            }
        }
    }

    async fn wishlist_remove(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Vec<Uuid>>(
            r#"
            UPDATE users SET wishlist = array_remove(wishlist, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING wishlist
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
