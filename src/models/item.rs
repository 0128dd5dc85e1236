//! Item (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Catalog item from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: Vec<String>,
    pub photo_url: String,
    pub qty_total: i64,
    pub qty_available: i64,
    /// `false` once the item is archived
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short item representation for joined views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: Uuid,
    pub name: String,
    pub photo_url: String,
}

impl Item {
    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id,
            name: self.name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }

    /// Build a new item, enforcing the quantity guard
    pub fn from_create(data: CreateItem) -> AppResult<Self> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        let quantities = Quantities::resolve(
            data.qty_total.as_ref(),
            data.qty_available.as_ref(),
            None,
        )?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: data.description.unwrap_or_else(|| vec![String::new()]),
            photo_url: data.photo_url.unwrap_or_default(),
            qty_total: quantities.total,
            qty_available: quantities.available,
            is_active: data.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }

    /// Produce the updated item without touching `self`, so a rejected
    /// update leaves nothing half-applied
    pub fn with_update(&self, data: UpdateItem) -> AppResult<Self> {
        let mut updated = self.clone();

        if data.qty_total.is_some() || data.qty_available.is_some() {
            let quantities = Quantities::resolve(
                data.qty_total.as_ref(),
                data.qty_available.as_ref(),
                Some((self.qty_total, self.qty_available)),
            )?;
            updated.qty_total = quantities.total;
            updated.qty_available = quantities.available;
        }

        if let Some(name) = data.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Name is required".to_string()));
            }
            updated.name = name.to_string();
        }
        if let Some(description) = data.description {
            updated.description = description;
        }
        if let Some(photo_url) = data.photo_url {
            updated.photo_url = photo_url;
        }
        if let Some(is_active) = data.is_active {
            updated.is_active = is_active;
        }
        updated.updated_at = Utc::now();
        Ok(updated)
    }
}

/// A quantity as sent by clients: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl QuantityInput {
    pub fn to_count(&self) -> AppResult<i64> {
        let value = match self {
            QuantityInput::Integer(n) => return Ok(*n),
            QuantityInput::Float(f) => *f,
            QuantityInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Validation("Quantities must be numbers".to_string()))?,
        };
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(AppError::Validation(
                "Quantities must be whole numbers".to_string(),
            ));
        }
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return Err(AppError::Validation(
                "Quantities are out of range".to_string(),
            ));
        }
        Ok(value as i64)
    }
}

/// Validated `(qtyTotal, qtyAvailable)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantities {
    pub total: i64,
    pub available: i64,
}

impl Quantities {
    /// Coerce and check both quantities. Missing values come from `current`
    /// on update; on create the total defaults to 0 and the available count
    /// to the total.
    pub fn resolve(
        total: Option<&QuantityInput>,
        available: Option<&QuantityInput>,
        current: Option<(i64, i64)>,
    ) -> AppResult<Self> {
        let total = match (total, current) {
            (Some(input), _) => input.to_count()?,
            (None, Some((current_total, _))) => current_total,
            (None, None) => 0,
        };
        let available = match (available, current) {
            (Some(input), _) => input.to_count()?,
            (None, Some((_, current_available))) => current_available,
            (None, None) => total,
        };

        if total < 0 || available < 0 {
            return Err(AppError::Validation("Quantities must be >= 0".to_string()));
        }
        if available > total {
            return Err(AppError::Validation(
                "qtyAvailable cannot exceed qtyTotal".to_string(),
            ));
        }
        Ok(Self { total, available })
    }
}

/// Create item request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[serde(default)]
    pub name: String,
    pub description: Option<Vec<String>>,
    pub photo_url: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub qty_total: Option<QuantityInput>,
    #[schema(value_type = Option<i64>)]
    pub qty_available: Option<QuantityInput>,
    pub is_active: Option<bool>,
}

/// Update item request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<Vec<String>>,
    pub photo_url: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub qty_total: Option<QuantityInput>,
    #[schema(value_type = Option<i64>)]
    pub qty_available: Option<QuantityInput>,
    pub is_active: Option<bool>,
}

/// Item listing query parameters
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ItemQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Only active items
    pub active: Option<bool>,
    /// Only archived items (staff only)
    pub inactive: Option<bool>,
    /// Case-insensitive pattern matched against name and description
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Sortable item fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSort {
    CreatedAt,
    UpdatedAt,
    Name,
    QtyTotal,
    QtyAvailable,
}

impl ItemSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSort::CreatedAt => "createdAt",
            ItemSort::UpdatedAt => "updatedAt",
            ItemSort::Name => "name",
            ItemSort::QtyTotal => "qtyTotal",
            ItemSort::QtyAvailable => "qtyAvailable",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            ItemSort::CreatedAt => "created_at",
            ItemSort::UpdatedAt => "updated_at",
            ItemSort::Name => "name",
            ItemSort::QtyTotal => "qty_total",
            ItemSort::QtyAvailable => "qty_available",
        }
    }
}

impl std::str::FromStr for ItemSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(ItemSort::CreatedAt),
            "updatedAt" => Ok(ItemSort::UpdatedAt),
            "name" => Ok(ItemSort::Name),
            "qtyTotal" => Ok(ItemSort::QtyTotal),
            "qtyAvailable" => Ok(ItemSort::QtyAvailable),
            other => Err(AppError::Validation(format!("Cannot sort by '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(AppError::Validation(format!(
                "sortOrder must be 'asc' or 'desc', got '{}'",
                other
            ))),
        }
    }
}

/// Store-level item filter built from an `ItemQuery`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    /// `Some(true)` active only, `Some(false)` archived only
    pub active: Option<bool>,
    pub search: Option<String>,
    pub sort: ItemSort,
    pub order: SortOrder,
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            active: None,
            search: None,
            sort: ItemSort::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl ItemFilter {
    pub fn from_query(query: &ItemQuery) -> AppResult<Self> {
        let active = if query.active == Some(true) {
            Some(true)
        } else if query.inactive == Some(true) {
            Some(false)
        } else {
            None
        };

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        // PostgreSQL runs the pattern as a POSIX ARE; the store reports what
        // that dialect rejects as the same validation error
        if let Some(ref pattern) = search {
            regex::Regex::new(pattern)
                .map_err(|_| AppError::Validation("Invalid search pattern".to_string()))?;
        }

        Ok(Self {
            active,
            search,
            sort: query.sort_by.as_deref().unwrap_or("createdAt").parse()?,
            order: query.sort_order.as_deref().unwrap_or("desc").parse()?,
        })
    }

    /// Only archived items are requested
    pub fn wants_archived(&self) -> bool {
        self.active == Some(false)
    }
}
