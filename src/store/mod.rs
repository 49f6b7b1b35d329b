pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Interval, Item, ItemPatch, NewInterval, NewItem, NewUser, ResolvedItem, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors from the storage engines
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
}

/// Item persistence. `update_item_fields` applies a partial patch (`None`
/// fields stay untouched); `resolve_item` reads one item with its interval
/// reference expanded.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn find_item(&self, id: Uuid) -> Result<Option<Item>, StoreError>;
    async fn items_for_owner(&self, owner: Uuid) -> Result<Vec<ResolvedItem>, StoreError>;
    async fn create_item(&self, new: NewItem) -> Result<Item, StoreError>;
    async fn update_item_fields(
        &self,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<Option<Item>, StoreError>;
    async fn delete_item(&self, id: Uuid) -> Result<(), StoreError>;
    async fn resolve_item(&self, id: Uuid) -> Result<Option<ResolvedItem>, StoreError>;
}

/// Recurrence interval persistence.
#[async_trait]
pub trait IntervalStore: Send + Sync {
    async fn find_interval(&self, id: Uuid) -> Result<Option<Interval>, StoreError>;
    async fn intervals_for_owner(&self, owner: Uuid) -> Result<Vec<Interval>, StoreError>;
    async fn create_interval(&self, new: NewInterval) -> Result<Interval, StoreError>;
    async fn delete_interval(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Full storage engine behind the API.
#[async_trait]
pub trait Store: UserStore + ItemStore + IntervalStore {
    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
