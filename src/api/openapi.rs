//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, inquiries, items, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lendhub API",
        version = "1.0.0",
        description = "Inventory lending and inquiry REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::signup,
        users::login,
        users::me,
        users::list_users,
        users::list_pending,
        users::update_user,
        users::approve_user,
        users::reject_user,
        // Items
        items::list_items,
        items::list_archived_items,
        items::create_item,
        items::update_item,
        items::delete_item,
        // Wishlist
        items::add_to_wishlist,
        items::remove_from_wishlist,
        items::get_wishlist,
        // Inquiries
        inquiries::create_inquiry,
        inquiries::get_user_inquiries,
        inquiries::get_all_inquiries,
        inquiries::reply_to_inquiry,
        inquiries::mark_inquiry_as_read,
        inquiries::mark_inquiry_as_read_by_admin,
        inquiries::get_inquiry_stats,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::Role,
            crate::models::user::ApprovalStatus,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            users::SignupResponse,
            users::LoginRequest,
            users::LoginResponse,
            users::UsersResponse,
            users::UserMessageResponse,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemSummary,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            items::ItemListResponse,
            items::MessageResponse,
            items::WishlistRequest,
            items::WishlistResponse,
            items::WishlistPageResponse,
            // Inquiries
            crate::models::inquiry::Inquiry,
            crate::models::inquiry::InquiryStatus,
            crate::models::inquiry::InquiryDetails,
            crate::models::inquiry::CreateInquiry,
            crate::models::inquiry::ReplyInquiry,
            crate::models::inquiry::InquiryStats,
            crate::models::inquiry::StatusCount,
            inquiries::InquiryResponse,
            inquiries::InquiryListResponse,
            inquiries::InquiryReadResponse,
            inquiries::InquiryStatsResponse,
            // Pagination
            crate::models::PageMeta,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Accounts, login and approval"),
        (name = "items", description = "Catalog item management"),
        (name = "wishlist", description = "Saved items"),
        (name = "inquiries", description = "Item inquiries and staff replies")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` JWT scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
