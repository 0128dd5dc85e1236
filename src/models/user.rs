//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Account role
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Editor,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    /// Staff roles moderate inquiries, items and accounts
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }

    /// Staff accounts wait for approval, viewers are approved on signup
    pub fn initial_approval_status(&self) -> ApprovalStatus {
        if self.is_staff() {
            ApprovalStatus::Pending
        } else {
            ApprovalStatus::Approved
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl_text_enum!(Role);

/// Staff-gated account activation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Invalid approval status: {}", s)),
        }
    }
}

impl_text_enum!(ApprovalStatus);

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub gender: String,
    pub contact_number: String,
    pub email: String,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub address: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub approval_status: ApprovalStatus,
    pub is_active: bool,
    /// Saved item ids
    pub wishlist: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Login requires an active, approved account
    pub fn ensure_can_login(&self) -> AppResult<()> {
        if !self.is_active {
            return Err(AppError::Authorization(
                "Your account is inactive. Please contact support.".to_string(),
            ));
        }
        match self.approval_status {
            ApprovalStatus::Approved => Ok(()),
            ApprovalStatus::Pending => Err(AppError::Authorization(
                "Your account is pending approval. Please wait for admin approval.".to_string(),
            )),
            ApprovalStatus::Rejected => Err(AppError::Authorization(
                "Your account has been rejected. Please contact support.".to_string(),
            )),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: Some(self.email.clone()),
        }
    }
}

/// Short user representation for joined views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Signup request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Age is required"))]
    pub age: String,
    #[validate(length(min = 1, message = "Gender is required"))]
    pub gender: String,
    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    /// Requested role, editor when omitted
    #[serde(rename = "type")]
    pub role: Option<Role>,
}

/// Update user request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// Fields only staff may change
    pub fn touches_privileged_fields(&self) -> bool {
        self.role.is_some() || self.is_active.is_some()
    }

    /// Apply onto a copy of `user`; the caller hashes the password beforehand
    pub fn apply(self, user: &User, password_hash: Option<String>) -> User {
        let mut updated = user.clone();
        if let Some(v) = self.first_name {
            updated.first_name = v;
        }
        if let Some(v) = self.last_name {
            updated.last_name = v;
        }
        if let Some(v) = self.age {
            updated.age = v;
        }
        if let Some(v) = self.gender {
            updated.gender = v;
        }
        if let Some(v) = self.contact_number {
            updated.contact_number = v;
        }
        if let Some(v) = self.email {
            updated.email = v;
        }
        if let Some(v) = self.username {
            updated.username = v;
        }
        if let Some(v) = self.address {
            updated.address = v;
        }
        if let Some(v) = self.role {
            updated.role = v;
        }
        if let Some(v) = self.is_active {
            updated.is_active = v;
        }
        if let Some(hash) = password_hash {
            updated.password_hash = hash;
        }
        updated.updated_at = Utc::now();
        updated
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn for_user(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: now + (expiration_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Require an admin or editor principal
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Access denied. Admin or Editor role required.".to_string(),
            ))
        }
    }

    pub fn require_self_or_staff(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.user_id == user_id || self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You can only modify your own account".to_string(),
            ))
        }
    }
}
