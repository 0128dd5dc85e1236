//! Inquiry model: a user's request about an item, adjudicated by staff

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{item::ItemSummary, user::UserSummary, Item, User};
use crate::error::{AppError, AppResult};

/// Inquiry status. `Pending` moves exactly once to `Approved` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Pending,
    Approved,
    Rejected,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "pending",
            InquiryStatus::Approved => "approved",
            InquiryStatus::Rejected => "rejected",
        }
    }

    /// Parse a staff decision; only terminal statuses are accepted
    pub fn parse_decision(s: &str) -> AppResult<Self> {
        match s.parse() {
            Ok(status @ (InquiryStatus::Approved | InquiryStatus::Rejected)) => Ok(status),
            _ => Err(AppError::Validation(
                "Status must be either 'approved' or 'rejected'".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InquiryStatus::Pending),
            "approved" => Ok(InquiryStatus::Approved),
            "rejected" => Ok(InquiryStatus::Rejected),
            _ => Err(format!("Invalid inquiry status: {}", s)),
        }
    }
}

impl_text_enum!(InquiryStatus);

/// Inquiry document. Item and user fields are snapshots taken at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_photo_url: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_message: String,
    pub status: InquiryStatus,
    pub admin_reply: String,
    pub replied_by: Option<Uuid>,
    pub replied_at: Option<DateTime<Utc>>,
    /// Seen by the requesting user
    pub is_read: bool,
    /// Seen by staff
    pub is_read_by_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A staff decision on a pending inquiry
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryReply {
    pub admin_reply: String,
    pub status: InquiryStatus,
    pub replied_by: Uuid,
    pub replied_at: DateTime<Utc>,
}

impl Inquiry {
    /// New pending inquiry from `user` about `item`
    pub fn open(item: &Item, user: &User, user_message: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            item_id: item.id,
            item_name: item.name.clone(),
            item_photo_url: item.photo_url.clone(),
            user_id: user.id,
            user_name: user.display_name(),
            user_message,
            status: InquiryStatus::Pending,
            admin_reply: String::new(),
            replied_by: None,
            replied_at: None,
            is_read: false,
            is_read_by_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InquiryStatus::Pending
    }

    /// Record the staff reply. Fails without touching `self` unless pending.
    pub fn apply_reply(&mut self, reply: &InquiryReply) -> AppResult<()> {
        if !self.is_pending() {
            return Err(AppError::InvalidState(
                "This inquiry has already been replied to".to_string(),
            ));
        }
        self.admin_reply = reply.admin_reply.clone();
        self.status = reply.status;
        self.replied_by = Some(reply.replied_by);
        self.replied_at = Some(reply.replied_at);
        self.is_read_by_admin = true;
        self.updated_at = reply.replied_at;
        Ok(())
    }
}

/// Inquiry with live item, requester and replier summaries.
/// The snapshot fields and these summaries may disagree.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InquiryDetails {
    #[serde(flatten)]
    pub inquiry: Inquiry,
    pub item: Option<ItemSummary>,
    pub user: Option<UserSummary>,
    pub replier: Option<UserSummary>,
}

/// Create inquiry request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiry {
    pub item_id: Option<Uuid>,
    pub user_message: Option<String>,
}

/// Staff reply request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyInquiry {
    pub admin_reply: Option<String>,
    /// "approved" or "rejected"
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: InquiryStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InquiryStats {
    pub total: i64,
    pub unread_by_admin: i64,
    pub by_status: Vec<StatusCount>,
}
