use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Interval {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub days: i32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInterval {
    pub owner: Uuid,
    pub name: String,
    pub days: i32,
}
