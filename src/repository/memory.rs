//! In-process stores.
//!
//! Documents live in `RwLock`-guarded vectors. Every check-then-write runs
//! under a single write guard, which gives the same atomicity the PostgreSQL
//! repositories get from conditional updates and unique indexes. Guards are
//! never held across an `.await`.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use regex::RegexBuilder;
use uuid::Uuid;

use super::{InquiriesStore, ItemsStore, UsersStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        inquiry::{Inquiry, InquiryReply, InquiryStats, StatusCount},
        item::{Item, ItemFilter, ItemSort, SortOrder},
        user::{ApprovalStatus, User},
        PageRequest,
    },
};

fn read<T>(lock: &RwLock<T>) -> AppResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> AppResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

fn item_not_found() -> AppError {
    AppError::NotFound("Item not found".to_string())
}

fn inquiry_not_found() -> AppError {
    AppError::NotFound("Inquiry not found".to_string())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryUsers {
    users: RwLock<Vec<User>>,
}

impl MemoryUsers {
    fn ensure_unique(users: &[User], candidate: &User) -> AppResult<()> {
        for other in users.iter().filter(|u| u.id != candidate.id) {
            if other.email == candidate.email {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
            if other.username == candidate.username {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UsersStore for MemoryUsers {
    async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        read(&self.users)?
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(user_not_found)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(read(&self.users)?.iter().find(|u| u.email == email).cloned())
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        Ok(read(&self.users)?
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list(&self, approval_status: Option<ApprovalStatus>) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = read(&self.users)?
            .iter()
            .filter(|u| approval_status.map_or(true, |s| u.approval_status == s))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        let mut users = write(&self.users)?;
        Self::ensure_unique(&users, user)?;
        users.push(user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let mut users = write(&self.users)?;
        Self::ensure_unique(&users, user)?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(user_not_found)?;
        slot.first_name = user.first_name.clone();
        slot.last_name = user.last_name.clone();
        slot.age = user.age.clone();
        slot.gender = user.gender.clone();
        slot.contact_number = user.contact_number.clone();
        slot.email = user.email.clone();
        slot.username = user.username.clone();
        slot.password_hash = user.password_hash.clone();
        slot.address = user.address.clone();
        slot.role = user.role;
        slot.is_active = user.is_active;
        slot.updated_at = user.updated_at;
        Ok(slot.clone())
    }

    async fn decide_approval(&self, id: Uuid, status: ApprovalStatus) -> AppResult<User> {
        let mut users = write(&self.users)?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(user_not_found)?;
        if user.approval_status != ApprovalStatus::Pending {
            return Err(AppError::InvalidState(
                "User is not pending approval".to_string(),
            ));
        }
        user.approval_status = status;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn wishlist_add(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Vec<Uuid>> {
        let mut users = write(&self.users)?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(user_not_found)?;
        if user.wishlist.contains(&item_id) {
            return Err(AppError::Conflict("Item already in wishlist".to_string()));
        }
        user.wishlist.push(item_id);
        user.updated_at = Utc::now();
        Ok(user.wishlist.clone())
    }

    async fn wishlist_remove(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Vec<Uuid>> {
        let mut users = write(&self.users)?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(user_not_found)?;
        user.wishlist.retain(|id| *id != item_id);
        user.updated_at = Utc::now();
        Ok(user.wishlist.clone())
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryItems {
    items: RwLock<Vec<Item>>,
}

fn compare_items(a: &Item, b: &Item, sort: ItemSort) -> std::cmp::Ordering {
    match sort {
        ItemSort::CreatedAt => a.created_at.cmp(&b.created_at),
        ItemSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        ItemSort::Name => a.name.cmp(&b.name),
        ItemSort::QtyTotal => a.qty_total.cmp(&b.qty_total),
        ItemSort::QtyAvailable => a.qty_available.cmp(&b.qty_available),
    }
}

#[async_trait]
impl ItemsStore for MemoryItems {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Item> {
        read(&self.items)?
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(item_not_found)
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Item>> {
        Ok(read(&self.items)?
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn search(&self, filter: &ItemFilter, page: PageRequest) -> AppResult<(Vec<Item>, i64)> {
        let pattern = filter
            .search
            .as_deref()
            .map(|s| RegexBuilder::new(s).case_insensitive(true).build())
            .transpose()
            .map_err(|_| AppError::Validation("Invalid search pattern".to_string()))?;

        let mut matches: Vec<Item> = read(&self.items)?
            .iter()
            .filter(|i| filter.active.map_or(true, |active| i.is_active == active))
            .filter(|i| {
                pattern.as_ref().map_or(true, |re| {
                    re.is_match(&i.name) || i.description.iter().any(|d| re.is_match(d))
                })
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ord = compare_items(a, b, filter.sort);
            let ord = match filter.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            ord.then_with(|| a.id.cmp(&b.id))
        });

        let total = matches.len() as i64;
        Ok((page.slice(matches), total))
    }

    async fn page_of_ids(&self, ids: Vec<Uuid>, page: PageRequest) -> AppResult<Vec<Item>> {
        let mut matches: Vec<Item> = read(&self.items)?
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(matches))
    }

    async fn create(&self, item: &Item) -> AppResult<()> {
        write(&self.items)?.push(item.clone());
        Ok(())
    }

    async fn save(&self, item: &Item) -> AppResult<Item> {
        let mut items = write(&self.items)?;
        let slot = items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(item_not_found)?;
        *slot = item.clone();
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut items = write(&self.items)?;
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Err(item_not_found());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Inquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryInquiries {
    inquiries: RwLock<Vec<Inquiry>>,
}

impl MemoryInquiries {
    fn update<F>(&self, id: Uuid, f: F) -> AppResult<Inquiry>
    where
        F: FnOnce(&mut Inquiry) -> AppResult<()>,
    {
        let mut inquiries = write(&self.inquiries)?;
        let inquiry = inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(inquiry_not_found)?;
        f(inquiry)?;
        Ok(inquiry.clone())
    }
}

#[async_trait]
impl InquiriesStore for MemoryInquiries {
    async fn create_pending(&self, inquiry: &Inquiry) -> AppResult<()> {
        let mut inquiries = write(&self.inquiries)?;
        let duplicate = inquiries.iter().any(|i| {
            i.user_id == inquiry.user_id && i.item_id == inquiry.item_id && i.is_pending()
        });
        if duplicate {
            return Err(AppError::Conflict(
                "You already have a pending inquiry for this item".to_string(),
            ));
        }
        inquiries.push(inquiry.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Inquiry> {
        read(&self.inquiries)?
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(inquiry_not_found)
    }

    async fn list(&self, user_id: Option<Uuid>, page: PageRequest) -> AppResult<(Vec<Inquiry>, i64)> {
        let mut rows: Vec<Inquiry> = read(&self.inquiries)?
            .iter()
            .filter(|i| user_id.map_or(true, |owner| i.user_id == owner))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        let total = rows.len() as i64;
        Ok((page.slice(rows), total))
    }

    async fn apply_reply(&self, id: Uuid, reply: &InquiryReply) -> AppResult<Inquiry> {
        self.update(id, |inquiry| inquiry.apply_reply(reply))
    }

    async fn mark_read_by_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Inquiry> {
        let mut inquiries = write(&self.inquiries)?;
        let inquiry = inquiries
            .iter_mut()
            .find(|i| i.id == id && i.user_id == user_id)
            .ok_or_else(inquiry_not_found)?;
        inquiry.is_read = true;
        inquiry.updated_at = Utc::now();
        Ok(inquiry.clone())
    }

    async fn mark_read_by_admin(&self, id: Uuid) -> AppResult<Inquiry> {
        self.update(id, |inquiry| {
            inquiry.is_read_by_admin = true;
            inquiry.updated_at = Utc::now();
            Ok(())
        })
    }

    async fn stats(&self) -> AppResult<InquiryStats> {
        let inquiries = read(&self.inquiries)?;
        let mut counts: BTreeMap<&'static str, StatusCount> = BTreeMap::new();
        for inquiry in inquiries.iter() {
            counts
                .entry(inquiry.status.as_str())
                .or_insert(StatusCount {
                    status: inquiry.status,
                    count: 0,
                })
                .count += 1;
        }
        Ok(InquiryStats {
            total: inquiries.len() as i64,
            unread_by_admin: inquiries.iter().filter(|i| !i.is_read_by_admin).count() as i64,
            by_status: counts.into_values().collect(),
        })
    }
}
