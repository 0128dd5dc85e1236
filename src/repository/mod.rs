//! Repository layer: store traits and their PostgreSQL / in-memory backends

pub mod inquiries;
pub mod items;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        inquiry::{Inquiry, InquiryReply, InquiryStats},
        item::{Item, ItemFilter},
        user::{ApprovalStatus, User},
        PageRequest,
    },
};

/// Identity store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersStore: Send + Sync {
    /// `NotFound` "User not found" when absent
    async fn get_by_id(&self, id: Uuid) -> AppResult<User>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn get_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;
    /// Newest first, optionally restricted to one approval status
    async fn list(&self, approval_status: Option<ApprovalStatus>) -> AppResult<Vec<User>>;
    /// `Conflict` on a duplicate email or username
    async fn create(&self, user: &User) -> AppResult<()>;
    /// Write the profile fields. Approval status and wishlist only change
    /// through their own operations.
    async fn save(&self, user: &User) -> AppResult<User>;
    /// Move a pending account to `status`; `InvalidState` otherwise
    async fn decide_approval(&self, id: Uuid, status: ApprovalStatus) -> AppResult<User>;
    /// `Conflict` when already present; returns the new wishlist
    async fn wishlist_add(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Vec<Uuid>>;
    async fn wishlist_remove(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Vec<Uuid>>;
}

/// Catalog store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsStore: Send + Sync {
    /// `NotFound` "Item not found" when absent
    async fn get_by_id(&self, id: Uuid) -> AppResult<Item>;
    async fn get_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Item>>;
    async fn search(&self, filter: &ItemFilter, page: PageRequest) -> AppResult<(Vec<Item>, i64)>;
    /// Newest first page of the given ids; missing ids are skipped
    async fn page_of_ids(&self, ids: Vec<Uuid>, page: PageRequest) -> AppResult<Vec<Item>>;
    async fn create(&self, item: &Item) -> AppResult<()>;
    async fn save(&self, item: &Item) -> AppResult<Item>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Inquiry store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InquiriesStore: Send + Sync {
    /// Insert a pending inquiry; `Conflict` when the same user already has
    /// one pending for the same item
    async fn create_pending(&self, inquiry: &Inquiry) -> AppResult<()>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Inquiry>;
    /// Newest first, optionally restricted to one requester
    async fn list(&self, user_id: Option<Uuid>, page: PageRequest) -> AppResult<(Vec<Inquiry>, i64)>;
    /// Apply the reply only if the inquiry is still pending
    async fn apply_reply(&self, id: Uuid, reply: &InquiryReply) -> AppResult<Inquiry>;
    /// `NotFound` unless the inquiry belongs to `user_id`
    async fn mark_read_by_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Inquiry>;
    async fn mark_read_by_admin(&self, id: Uuid) -> AppResult<Inquiry>;
    async fn stats(&self) -> AppResult<InquiryStats>;
}

/// Store handles injected into the services
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UsersStore>,
    pub items: Arc<dyn ItemsStore>,
    pub inquiries: Arc<dyn InquiriesStore>,
}

impl Repository {
    /// PostgreSQL-backed repository over the given pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            items: Arc::new(items::ItemsRepository::new(pool.clone())),
            inquiries: Arc::new(inquiries::InquiriesRepository::new(pool)),
        }
    }

    /// Process-local repository, for development runs and tests
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUsers::default()),
            items: Arc::new(memory::MemoryItems::default()),
            inquiries: Arc::new(memory::MemoryInquiries::default()),
        }
    }
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: impl Fn(Option<&str>) -> String) -> crate::error::AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            crate::error::AppError::Conflict(message(db.constraint()))
        }
        _ => err.into(),
    }
}

/// PostgreSQL `invalid_regular_expression`
const INVALID_REGEX_SQLSTATE: &str = "2201B";

/// Map a pattern that `~*` cannot compile to `Validation`, anything else to `Database`
pub(crate) fn invalid_search_pattern(err: sqlx::Error) -> crate::error::AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(INVALID_REGEX_SQLSTATE) => {
            crate::error::AppError::Validation("Invalid search pattern".to_string())
        }
        _ => err.into(),
    }
}
