use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Interval;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub done_num: Option<i64>,
    pub interval: Option<String>,
    pub category: String,
    pub date: DateTime<Utc>,
    pub interval_ref: Option<Uuid>,
}

/// Item as served to clients: `interval_ref` expanded to the referenced
/// Interval, or null when unset or dangling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedItem {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub done_num: Option<i64>,
    pub interval: Option<String>,
    pub category: String,
    pub date: DateTime<Utc>,
    pub interval_ref: Option<Interval>,
}

impl ResolvedItem {
    pub fn new(item: Item, interval_ref: Option<Interval>) -> Self {
        Self {
            id: item.id,
            owner: item.owner,
            name: item.name,
            done_num: item.done_num,
            interval: item.interval,
            category: item.category,
            date: item.date,
            interval_ref,
        }
    }
}

/// Insert payload; the handler has already applied defaults. The store
/// assigns the id.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub owner: Uuid,
    pub name: String,
    pub done_num: Option<i64>,
    pub category: String,
    pub date: DateTime<Utc>,
    pub interval_ref: Option<Uuid>,
}

/// Partial update. `None` leaves the stored field untouched; a patch never
/// clears a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub done_num: Option<i64>,
    pub interval_ref: Option<Uuid>,
    pub category: Option<String>,
}
