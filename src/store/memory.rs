use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Interval, Item, ItemPatch, NewInterval, NewItem, NewUser, ResolvedItem, User};
use crate::store::{IntervalStore, ItemStore, Store, StoreError, UserStore};

/// In-memory store with the same contract as the Postgres engine. Backs the
/// test suite and `DATABASE_BACKEND=memory` for development.
///
/// Lock order where two maps are needed: items before intervals.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    items: Mutex<HashMap<Uuid, Item>>,
    intervals: Mutex<HashMap<Uuid, Interval>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password: new.password,
            date: Utc::now(),
        };
        self.users.lock().await.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn find_item(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        Ok(self.items.lock().await.get(&id).cloned())
    }

    async fn items_for_owner(&self, owner: Uuid) -> Result<Vec<ResolvedItem>, StoreError> {
        let mut owned: Vec<Item> = {
            let items = self.items.lock().await;
            items
                .values()
                .filter(|item| item.owner == owner)
                .cloned()
                .collect()
        };
        owned.sort_by(|a, b| b.date.cmp(&a.date));

        let intervals = self.intervals.lock().await;
        Ok(owned
            .into_iter()
            .map(|item| {
                let interval_ref = item.interval_ref.and_then(|id| intervals.get(&id).cloned());
                ResolvedItem::new(item, interval_ref)
            })
            .collect())
    }

    async fn create_item(&self, new: NewItem) -> Result<Item, StoreError> {
        let item = Item {
            id: Uuid::new_v4(),
            owner: new.owner,
            name: new.name,
            done_num: new.done_num,
            interval: None,
            category: new.category,
            date: new.date,
            interval_ref: new.interval_ref,
        };
        self.items.lock().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item_fields(
        &self,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.lock().await;
        let item = match items.get_mut(&id) {
            Some(item) => item,
            None => return Ok(None),
        };

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(date) = patch.date {
            item.date = date;
        }
        if let Some(done_num) = patch.done_num {
            item.done_num = Some(done_num);
        }
        if let Some(interval_ref) = patch.interval_ref {
            item.interval_ref = Some(interval_ref);
        }
        if let Some(category) = patch.category {
            item.category = category;
        }

        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), StoreError> {
        self.items.lock().await.remove(&id);
        Ok(())
    }

    async fn resolve_item(&self, id: Uuid) -> Result<Option<ResolvedItem>, StoreError> {
        let item = match self.items.lock().await.get(&id).cloned() {
            Some(item) => item,
            None => return Ok(None),
        };

        let interval_ref = match item.interval_ref {
            Some(ref_id) => self.intervals.lock().await.get(&ref_id).cloned(),
            None => None,
        };

        Ok(Some(ResolvedItem::new(item, interval_ref)))
    }
}

#[async_trait]
impl IntervalStore for MemoryStore {
    async fn find_interval(&self, id: Uuid) -> Result<Option<Interval>, StoreError> {
        Ok(self.intervals.lock().await.get(&id).cloned())
    }

    async fn intervals_for_owner(&self, owner: Uuid) -> Result<Vec<Interval>, StoreError> {
        let mut owned: Vec<Interval> = {
            let intervals = self.intervals.lock().await;
            intervals
                .values()
                .filter(|interval| interval.owner == owner)
                .cloned()
                .collect()
        };
        owned.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(owned)
    }

    async fn create_interval(&self, new: NewInterval) -> Result<Interval, StoreError> {
        let interval = Interval {
            id: Uuid::new_v4(),
            owner: new.owner,
            name: new.name,
            days: new.days,
            date: Utc::now(),
        };
        self.intervals.lock().await.insert(interval.id, interval.clone());
        Ok(interval)
    }

    async fn delete_interval(&self, id: Uuid) -> Result<(), StoreError> {
        self.intervals.lock().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
