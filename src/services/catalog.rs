//! Catalog management service: items and wishlists

use uuid::Uuid;

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::{
        item::{CreateItem, Item, ItemFilter, ItemQuery, UpdateItem},
        user::UserClaims,
        PageMeta, PageQuery, PageRequest,
    },
    repository::Repository,
};

/// One page of a catalog search, with the filter that produced it
#[derive(Debug)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub meta: PageMeta,
    pub filter: ItemFilter,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    pagination: PaginationConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// Search items. Archived-only listings need a staff principal.
    pub async fn list_items(
        &self,
        principal: Option<&UserClaims>,
        query: &ItemQuery,
    ) -> AppResult<ItemPage> {
        let filter = ItemFilter::from_query(query)?;
        if filter.wants_archived() {
            match principal {
                None => {
                    return Err(AppError::Authentication(
                        "Authentication required to access archived items".to_string(),
                    ))
                }
                Some(claims) if !claims.is_staff() => {
                    return Err(AppError::Authorization(
                        "Access denied. Admin or Editor role required to view archived items."
                            .to_string(),
                    ))
                }
                Some(_) => {}
            }
        }

        let page = PageQuery {
            page: query.page,
            limit: query.limit,
        }
        .resolve(&self.pagination)?;

        let (items, total) = self.repository.items.search(&filter, page).await?;
        Ok(ItemPage {
            items,
            meta: PageMeta::new(total, &page),
            filter,
        })
    }

    pub async fn create_item(&self, actor: &UserClaims, data: CreateItem) -> AppResult<Item> {
        actor.require_staff()?;
        let item = Item::from_create(data)?;
        self.repository.items.create(&item).await?;
        tracing::info!(item_id = %item.id, created_by = %actor.user_id, "Item created");
        Ok(item)
    }

    /// Update an item; a rejected update leaves storage unchanged
    pub async fn update_item(&self, actor: &UserClaims, id: Uuid, data: UpdateItem) -> AppResult<Item> {
        actor.require_staff()?;
        let current = self.repository.items.get_by_id(id).await?;
        let updated = current.with_update(data)?;
        self.repository.items.save(&updated).await
    }

    pub async fn delete_item(&self, actor: &UserClaims, id: Uuid) -> AppResult<()> {
        actor.require_staff()?;
        self.repository.items.delete(id).await?;
        tracing::info!(item_id = %id, deleted_by = %actor.user_id, "Item deleted");
        Ok(())
    }

    pub async fn wishlist_add(&self, user_id: Uuid, item_id: Option<Uuid>) -> AppResult<Vec<Uuid>> {
        let item_id = item_id.ok_or_else(|| AppError::Validation("Item ID is required".to_string()))?;
        self.repository.items.get_by_id(item_id).await?;
        self.repository.users.wishlist_add(user_id, item_id).await
    }

    pub async fn wishlist_remove(&self, user_id: Uuid, item_id: Option<Uuid>) -> AppResult<Vec<Uuid>> {
        let item_id = item_id.ok_or_else(|| AppError::Validation("Item ID is required".to_string()))?;
        self.repository.users.wishlist_remove(user_id, item_id).await
    }

    /// Wishlisted items, newest first. `total` counts wishlist entries.
    pub async fn wishlist(&self, user_id: Uuid, query: &PageQuery) -> AppResult<(Vec<Item>, PageMeta)> {
        let page: PageRequest = query.resolve(&self.pagination)?;
        let user = self.repository.users.get_by_id(user_id).await?;
        let total = user.wishlist.len() as i64;
        let items = self.repository.items.page_of_ids(user.wishlist, page).await?;
        Ok((items, PageMeta::new(total, &page)))
    }
}
