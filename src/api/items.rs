//! Catalog and wishlist endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        item::{CreateItem, Item, ItemQuery, UpdateItem},
        user::UserClaims,
        PageMeta, PageQuery,
    },
    services::catalog::ItemPage,
};

use super::{AppJson, AppPath, AppQuery, AuthenticatedUser, MaybeAuthenticatedUser};

/// Item page plus the effective sort and search
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemListResponse {
    pub items: Vec<Item>,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub sort_by: String,
    pub sort_order: String,
    pub search_query: String,
}

impl From<ItemPage> for ItemListResponse {
    fn from(page: ItemPage) -> Self {
        Self {
            items: page.items,
            meta: page.meta,
            sort_by: page.filter.sort.as_str().to_string(),
            sort_order: page.filter.order.as_str().to_string(),
            search_query: page.filter.search.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub item_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct WishlistResponse {
    pub message: String,
    pub wishlist: Vec<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct WishlistPageResponse {
    pub message: String,
    pub data: Vec<Item>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

async fn list(
    state: &crate::AppState,
    principal: Option<&UserClaims>,
    query: &ItemQuery,
) -> AppResult<Json<ItemListResponse>> {
    let page = state.services.catalog.list_items(principal, query).await?;
    Ok(Json(page.into()))
}

/// List catalog items
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(ItemQuery),
    responses(
        (status = 200, description = "Page of items", body = ItemListResponse),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Archived items require authentication"),
        (status = 403, description = "Archived items require Admin or Editor role")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    MaybeAuthenticatedUser(claims): MaybeAuthenticatedUser,
    AppQuery(query): AppQuery<ItemQuery>,
) -> AppResult<Json<ItemListResponse>> {
    list(&state, claims.as_ref(), &query).await
}

/// List catalog items (authenticated)
#[utoipa::path(
    get,
    path = "/items/archived",
    tag = "items",
    security(("bearer_auth" = [])),
    params(ItemQuery),
    responses(
        (status = 200, description = "Page of items", body = ItemListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Archived items require Admin or Editor role")
    )
)]
pub async fn list_archived_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppQuery(query): AppQuery<ItemQuery>,
) -> AppResult<Json<ItemListResponse>> {
    list(&state, Some(&claims), &query).await
}

/// Create a catalog item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin or Editor role required")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let item = state.services.catalog.create_item(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update a catalog item
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin or Editor role required"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(data): AppJson<UpdateItem>,
) -> AppResult<Json<Item>> {
    let item = state.services.catalog.update_item(&claims, id, data).await?;
    Ok(Json(item))
}

/// Delete a catalog item
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 403, description = "Admin or Editor role required"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.delete_item(&claims, id).await?;
    Ok(Json(MessageResponse {
        message: "Item deleted successfully".to_string(),
    }))
}

/// Add an item to the caller's wishlist
#[utoipa::path(
    post,
    path = "/items/wishlist/add",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    request_body = WishlistRequest,
    responses(
        (status = 200, description = "Item added", body = WishlistResponse),
        (status = 400, description = "Item ID is required"),
        (status = 404, description = "Item or user not found"),
        (status = 409, description = "Item already in wishlist")
    )
)]
pub async fn add_to_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(request): AppJson<WishlistRequest>,
) -> AppResult<Json<WishlistResponse>> {
    let wishlist = state
        .services
        .catalog
        .wishlist_add(claims.user_id, request.item_id)
        .await?;
    Ok(Json(WishlistResponse {
        message: "Item added to wishlist successfully".to_string(),
        wishlist,
    }))
}

/// Remove an item from the caller's wishlist
#[utoipa::path(
    post,
    path = "/items/wishlist/remove",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    request_body = WishlistRequest,
    responses(
        (status = 200, description = "Item removed", body = WishlistResponse),
        (status = 400, description = "Item ID is required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn remove_from_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(request): AppJson<WishlistRequest>,
) -> AppResult<Json<WishlistResponse>> {
    let wishlist = state
        .services
        .catalog
        .wishlist_remove(claims.user_id, request.item_id)
        .await?;
    Ok(Json(WishlistResponse {
        message: "Item removed from wishlist successfully".to_string(),
        wishlist,
    }))
}

/// List the caller's wishlist
#[utoipa::path(
    get,
    path = "/items/wishlist",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of wishlisted items", body = WishlistPageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<WishlistPageResponse>> {
    let (data, meta) = state.services.catalog.wishlist(claims.user_id, &query).await?;
    Ok(Json(WishlistPageResponse {
        message: "Wishlist retrieved successfully".to_string(),
        data,
        meta,
    }))
}
