//! API handlers for Lendhub REST endpoints

pub mod health;
pub mod inquiries;
pub mod items;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// JSON body extractor reporting malformed input as an `AppError`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor reporting malformed input as an `AppError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path extractor reporting malformed ids as an `AppError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

fn bearer_claims(parts: &Parts, state: &AppState) -> Result<UserClaims, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

    UserClaims::from_token(token, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Authentication(e.to_string()))
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        bearer_claims(parts, state).map(AuthenticatedUser)
    }
}

/// Principal when a valid token is present, anonymous otherwise.
/// A missing or unusable token never rejects the request.
pub struct MaybeAuthenticatedUser(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticatedUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthenticatedUser(bearer_claims(parts, state).ok()))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Users
        .route("/users", post(users::signup).get(users::list_users))
        .route("/users/login", post(users::login))
        .route("/users/me", get(users::me))
        .route("/users/pending", get(users::list_pending))
        .route("/users/:id", put(users::update_user))
        .route("/users/:id/approve", patch(users::approve_user))
        .route("/users/:id/reject", patch(users::reject_user))
        // Items (catalog)
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/archived", get(items::list_archived_items))
        .route("/items/:id", put(items::update_item).delete(items::delete_item))
        // Wishlist
        .route("/items/wishlist", get(items::get_wishlist))
        .route("/items/wishlist/add", post(items::add_to_wishlist))
        .route("/items/wishlist/remove", post(items::remove_from_wishlist))
        // Inquiries
        .route("/inquiries", post(inquiries::create_inquiry))
        .route("/inquiries/user", get(inquiries::get_user_inquiries))
        .route("/inquiries/all", get(inquiries::get_all_inquiries))
        .route("/inquiries/stats", get(inquiries::get_inquiry_stats))
        .route("/inquiries/:id/reply", post(inquiries::reply_to_inquiry))
        .route("/inquiries/:id/read", patch(inquiries::mark_inquiry_as_read))
        .route("/inquiries/:id/read-admin", patch(inquiries::mark_inquiry_as_read_by_admin))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
