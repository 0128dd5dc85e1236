//! Inquiry lifecycle: creation, staff replies, read flags, listings and stats

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::{
        inquiry::{
            CreateInquiry, Inquiry, InquiryDetails, InquiryReply, InquiryStats, InquiryStatus,
            ReplyInquiry,
        },
        user::{UserClaims, UserSummary},
        PageMeta, PageQuery,
    },
    repository::Repository,
};

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct InquiriesService {
    repository: Repository,
    pagination: PaginationConfig,
}

impl InquiriesService {
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// Open a pending inquiry about an item
    pub async fn create(&self, user_id: Uuid, data: CreateInquiry) -> AppResult<InquiryDetails> {
        let (Some(item_id), Some(message)) = (data.item_id, required(data.user_message)) else {
            return Err(AppError::Validation(
                "Item ID and message are required".to_string(),
            ));
        };

        let item = self.repository.items.get_by_id(item_id).await?;
        let user = self.repository.users.get_by_id(user_id).await?;

        let inquiry = Inquiry::open(&item, &user, message);
        self.repository.inquiries.create_pending(&inquiry).await?;
        tracing::info!(
            inquiry_id = %inquiry.id,
            item_id = %item.id,
            user_id = %user.id,
            "Inquiry created"
        );

        Ok(InquiryDetails {
            item: Some(item.summary()),
            user: Some(user.summary()),
            replier: None,
            inquiry,
        })
    }

    /// The requester's own inquiries, newest first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        query: &PageQuery,
    ) -> AppResult<(Vec<InquiryDetails>, PageMeta)> {
        let page = query.resolve(&self.pagination)?;
        let (rows, total) = self.repository.inquiries.list(Some(user_id), page).await?;
        Ok((self.details(rows).await?, PageMeta::new(total, &page)))
    }

    /// Every inquiry, newest first
    pub async fn list_all(
        &self,
        actor: &UserClaims,
        query: &PageQuery,
    ) -> AppResult<(Vec<InquiryDetails>, PageMeta)> {
        actor.require_staff()?;
        let page = query.resolve(&self.pagination)?;
        let (rows, total) = self.repository.inquiries.list(None, page).await?;
        Ok((self.details(rows).await?, PageMeta::new(total, &page)))
    }

    /// Record the staff decision on a pending inquiry. One-shot.
    pub async fn reply(
        &self,
        actor: &UserClaims,
        id: Uuid,
        data: ReplyInquiry,
    ) -> AppResult<InquiryDetails> {
        actor.require_staff()?;

        let (Some(admin_reply), Some(status)) = (required(data.admin_reply), required(data.status))
        else {
            return Err(AppError::Validation(
                "Admin reply and status are required".to_string(),
            ));
        };
        let status = InquiryStatus::parse_decision(&status)?;

        let reply = InquiryReply {
            admin_reply,
            status,
            replied_by: actor.user_id,
            replied_at: Utc::now(),
        };
        let inquiry = self.repository.inquiries.apply_reply(id, &reply).await?;
        tracing::info!(
            inquiry_id = %inquiry.id,
            replied_by = %actor.user_id,
            status = %inquiry.status,
            "Inquiry replied"
        );

        let mut details = self.details(vec![inquiry]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::Internal("reply produced no inquiry".to_string()))
    }

    /// Requester marks their own inquiry as read
    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> AppResult<Inquiry> {
        self.repository.inquiries.mark_read_by_user(id, user_id).await
    }

    pub async fn mark_read_by_admin(&self, actor: &UserClaims, id: Uuid) -> AppResult<Inquiry> {
        actor.require_staff()?;
        self.repository.inquiries.mark_read_by_admin(id).await
    }

    pub async fn stats(&self, actor: &UserClaims) -> AppResult<InquiryStats> {
        actor.require_staff()?;
        self.repository.inquiries.stats().await
    }

    /// Join live item, requester and replier summaries onto each inquiry
    async fn details(&self, rows: Vec<Inquiry>) -> AppResult<Vec<InquiryDetails>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut item_ids: Vec<Uuid> = rows.iter().map(|i| i.item_id).collect();
        item_ids.sort();
        item_ids.dedup();
        let mut user_ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|i| std::iter::once(i.user_id).chain(i.replied_by))
            .collect();
        user_ids.sort();
        user_ids.dedup();

        let items: HashMap<Uuid, _> = self
            .repository
            .items
            .get_many(item_ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item.summary()))
            .collect();
        let users: HashMap<Uuid, UserSummary> = self
            .repository
            .users
            .get_many(user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.summary()))
            .collect();

        Ok(rows
            .into_iter()
            .map(|inquiry| InquiryDetails {
                item: items.get(&inquiry.item_id).cloned(),
                user: users.get(&inquiry.user_id).cloned(),
                replier: inquiry
                    .replied_by
                    .and_then(|id| users.get(&id))
                    .map(|summary| UserSummary {
                        email: None,
                        ..summary.clone()
                    }),
                inquiry,
            })
            .collect())
    }
}
