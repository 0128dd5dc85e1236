//! Business logic services

pub mod catalog;
pub mod inquiries;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

use crate::{
    config::{AuthConfig, PaginationConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub inquiries: inquiries::InquiriesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone(), pagination),
            inquiries: inquiries::InquiriesService::new(repository, pagination),
        }
    }
}
