//! Shared fixtures for service tests

use crate::{
    config::{AuthConfig, PaginationConfig},
    models::{
        item::{CreateItem, Item, QuantityInput},
        user::{ApprovalStatus, CreateUser, Role, User, UserClaims},
    },
    repository::Repository,
    services::Services,
};

pub(crate) fn signup_request(email: &str, username: &str, role: Option<Role>) -> CreateUser {
    CreateUser {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        age: "36".to_string(),
        gender: "female".to_string(),
        contact_number: "555-0100".to_string(),
        email: email.to_string(),
        username: username.to_string(),
        password: "secret-pw".to_string(),
        address: "12 Analytical Row".to_string(),
        role,
    }
}

pub(crate) struct Fixture {
    pub repository: Repository,
    pub services: Services,
    pub auth: AuthConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let repository = Repository::in_memory();
        let auth = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..Default::default()
        };
        let services = Services::new(repository.clone(), auth.clone(), PaginationConfig::default());
        Self {
            repository,
            services,
            auth,
        }
    }

    fn username(email: &str) -> String {
        format!("user-{}", email.split('@').next().unwrap_or(email))
    }

    /// An approved viewer and its claims
    pub async fn viewer(&self, email: &str) -> (User, UserClaims) {
        let user = self
            .services
            .users
            .signup(signup_request(email, &Self::username(email), Some(Role::Viewer)))
            .await
            .unwrap();
        let claims = UserClaims::for_user(&user, 1);
        (user, claims)
    }

    /// An approved staff account and its claims
    pub async fn staff(&self, email: &str, role: Role) -> (User, UserClaims) {
        let user = self
            .services
            .users
            .signup(signup_request(email, &Self::username(email), Some(role)))
            .await
            .unwrap();
        let user = self
            .repository
            .users
            .decide_approval(user.id, ApprovalStatus::Approved)
            .await
            .unwrap();
        let claims = UserClaims::for_user(&user, 1);
        (user, claims)
    }

    pub async fn item(&self, actor: &UserClaims, name: &str, qty: i64) -> Item {
        self.services
            .catalog
            .create_item(
                actor,
                CreateItem {
                    name: name.to_string(),
                    qty_total: Some(QuantityInput::Integer(qty)),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    }
}
