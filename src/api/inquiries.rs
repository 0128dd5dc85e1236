//! Inquiry endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        inquiry::{CreateInquiry, Inquiry, InquiryDetails, InquiryStats, ReplyInquiry},
        PageMeta, PageQuery,
    },
};

use super::{AppJson, AppPath, AppQuery, AuthenticatedUser};

#[derive(Serialize, ToSchema)]
pub struct InquiryResponse {
    pub message: String,
    pub inquiry: InquiryDetails,
}

#[derive(Serialize, ToSchema)]
pub struct InquiryListResponse {
    pub message: String,
    pub inquiries: Vec<InquiryDetails>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Read-flag update result; carries the bare inquiry
#[derive(Serialize, ToSchema)]
pub struct InquiryReadResponse {
    pub message: String,
    pub inquiry: Inquiry,
}

#[derive(Serialize, ToSchema)]
pub struct InquiryStatsResponse {
    pub message: String,
    pub stats: InquiryStats,
}

/// Open an inquiry about an item
#[utoipa::path(
    post,
    path = "/inquiries",
    tag = "inquiries",
    security(("bearer_auth" = [])),
    request_body = CreateInquiry,
    responses(
        (status = 201, description = "Inquiry created", body = InquiryResponse),
        (status = 400, description = "Item ID and message are required"),
        (status = 404, description = "Item or user not found"),
        (status = 409, description = "A pending inquiry for this item already exists")
    )
)]
pub async fn create_inquiry(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateInquiry>,
) -> AppResult<(StatusCode, Json<InquiryResponse>)> {
    let inquiry = state.services.inquiries.create(claims.user_id, data).await?;
    Ok((
        StatusCode::CREATED,
        Json(InquiryResponse {
            message: "Inquiry created successfully".to_string(),
            inquiry,
        }),
    ))
}

/// List the caller's inquiries, newest first
#[utoipa::path(
    get,
    path = "/inquiries/user",
    tag = "inquiries",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of inquiries", body = InquiryListResponse),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn get_user_inquiries(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<InquiryListResponse>> {
    let (inquiries, meta) = state
        .services
        .inquiries
        .list_for_user(claims.user_id, &query)
        .await?;
    Ok(Json(InquiryListResponse {
        message: "User inquiries retrieved successfully".to_string(),
        inquiries,
        meta,
    }))
}

/// List every inquiry, newest first
#[utoipa::path(
    get,
    path = "/inquiries/all",
    tag = "inquiries",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of inquiries", body = InquiryListResponse),
        (status = 403, description = "Admin or Editor role required")
    )
)]
pub async fn get_all_inquiries(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<InquiryListResponse>> {
    let (inquiries, meta) = state.services.inquiries.list_all(&claims, &query).await?;
    Ok(Json(InquiryListResponse {
        message: "All inquiries retrieved successfully".to_string(),
        inquiries,
        meta,
    }))
}

/// Reply to a pending inquiry
#[utoipa::path(
    post,
    path = "/inquiries/{id}/reply",
    tag = "inquiries",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Inquiry ID")
    ),
    request_body = ReplyInquiry,
    responses(
        (status = 200, description = "Reply recorded", body = InquiryResponse),
        (status = 400, description = "Invalid reply or inquiry already replied to"),
        (status = 403, description = "Admin or Editor role required"),
        (status = 404, description = "Inquiry not found")
    )
)]
pub async fn reply_to_inquiry(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(data): AppJson<ReplyInquiry>,
) -> AppResult<Json<InquiryResponse>> {
    let inquiry = state.services.inquiries.reply(&claims, id, data).await?;
    Ok(Json(InquiryResponse {
        message: "Reply sent successfully".to_string(),
        inquiry,
    }))
}

/// Mark one of the caller's inquiries as read
#[utoipa::path(
    patch,
    path = "/inquiries/{id}/read",
    tag = "inquiries",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Inquiry ID")
    ),
    responses(
        (status = 200, description = "Inquiry marked as read", body = InquiryReadResponse),
        (status = 404, description = "Inquiry not found")
    )
)]
pub async fn mark_inquiry_as_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<InquiryReadResponse>> {
    let inquiry = state.services.inquiries.mark_read(claims.user_id, id).await?;
    Ok(Json(InquiryReadResponse {
        message: "Inquiry marked as read".to_string(),
        inquiry,
    }))
}

/// Mark an inquiry as seen by staff
#[utoipa::path(
    patch,
    path = "/inquiries/{id}/read-admin",
    tag = "inquiries",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Inquiry ID")
    ),
    responses(
        (status = 200, description = "Inquiry marked as read by admin", body = InquiryReadResponse),
        (status = 403, description = "Admin or Editor role required"),
        (status = 404, description = "Inquiry not found")
    )
)]
pub async fn mark_inquiry_as_read_by_admin(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<InquiryReadResponse>> {
    let inquiry = state
        .services
        .inquiries
        .mark_read_by_admin(&claims, id)
        .await?;
    Ok(Json(InquiryReadResponse {
        message: "Inquiry marked as read by admin".to_string(),
        inquiry,
    }))
}

/// Inquiry counts by status
#[utoipa::path(
    get,
    path = "/inquiries/stats",
    tag = "inquiries",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inquiry statistics", body = InquiryStatsResponse),
        (status = 403, description = "Admin or Editor role required")
    )
)]
pub async fn get_inquiry_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<InquiryStatsResponse>> {
    let stats = state.services.inquiries.stats(&claims).await?;
    Ok(Json(InquiryStatsResponse {
        message: "Inquiry statistics retrieved successfully".to_string(),
        stats,
    }))
}
