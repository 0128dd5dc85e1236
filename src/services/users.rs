//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{ApprovalStatus, CreateUser, Role, UpdateUser, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new account. Staff roles start pending approval.
    pub async fn signup(&self, data: CreateUser) -> AppResult<User> {
        data.validate()?;

        let role = data.role.unwrap_or_default();
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: data.first_name,
            last_name: data.last_name,
            age: data.age,
            gender: data.gender,
            contact_number: data.contact_number,
            email: data.email,
            username: data.username,
            password_hash: self.hash_password(&data.password)?,
            address: data.address,
            role,
            approval_status: role.initial_approval_status(),
            is_active: true,
            wishlist: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.repository.users.create(&user).await?;
        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            approval_status = %user.approval_status,
            "Account created"
        );
        Ok(user)
    }

    /// Authenticate by email and return a JWT token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.ensure_can_login()?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let token = UserClaims::for_user(&user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list_users(&self, actor: &UserClaims) -> AppResult<Vec<User>> {
        actor.require_staff()?;
        self.repository.users.list(None).await
    }

    /// Accounts waiting for a staff decision
    pub async fn list_pending(&self, actor: &UserClaims) -> AppResult<Vec<User>> {
        actor.require_staff()?;
        self.repository.users.list(Some(ApprovalStatus::Pending)).await
    }

    /// Update an account. Users may edit themselves; role and active flag
    /// are staff-only.
    pub async fn update_user(&self, actor: &UserClaims, id: Uuid, data: UpdateUser) -> AppResult<User> {
        actor.require_self_or_staff(id)?;
        if data.touches_privileged_fields() && !actor.is_staff() {
            return Err(AppError::Authorization(
                "Only staff can change role or active status".to_string(),
            ));
        }
        data.validate()?;

        let current = self.repository.users.get_by_id(id).await?;
        let password_hash = match data.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };
        let updated = data.apply(&current, password_hash);
        self.repository.users.save(&updated).await
    }

    /// Approve or reject a pending account
    pub async fn decide_approval(
        &self,
        actor: &UserClaims,
        id: Uuid,
        status: ApprovalStatus,
    ) -> AppResult<User> {
        actor.require_staff()?;
        let user = self.repository.users.decide_approval(id, status).await?;
        tracing::info!(
            user_id = %user.id,
            decided_by = %actor.user_id,
            approval_status = %status,
            "Account approval decided"
        );
        Ok(user)
    }

    /// Create the configured admin account if it does not exist yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let Some(admin) = self.config.bootstrap_admin.as_ref() else {
            return Ok(());
        };
        if self.repository.users.find_by_email(&admin.email).await?.is_some() {
            return Ok(());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
            age: String::new(),
            gender: String::new(),
            contact_number: String::new(),
            email: admin.email.clone(),
            username: admin.username.clone(),
            password_hash: self.hash_password(&admin.password)?,
            address: String::new(),
            role: Role::Admin,
            approval_status: ApprovalStatus::Approved,
            is_active: true,
            wishlist: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.repository.users.create(&user).await?;
        tracing::info!(email = %user.email, "Bootstrap admin account created");
        Ok(())
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
