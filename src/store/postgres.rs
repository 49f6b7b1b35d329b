use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::models::{Interval, Item, ItemPatch, NewInterval, NewItem, NewUser, ResolvedItem, User};
use crate::store::{IntervalStore, ItemStore, Store, StoreError, UserStore};

/// Postgres-backed store: one pool, embedded migrations run at startup.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using DATABASE_URL and the configured pool settings, then
    /// bring the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Connected to Postgres and ran migrations");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, date FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, date FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password, date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, password, date",
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ItemStore for PgStore {
    async fn find_item(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        let item = sqlx::query_as::<_, Item>(
            r#"SELECT id, owner, name, done_num, "interval", category, date, interval_ref
               FROM items
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn items_for_owner(&self, owner: Uuid) -> Result<Vec<ResolvedItem>, StoreError> {
        let items = sqlx::query_as::<_, Item>(
            r#"SELECT id, owner, name, done_num, "interval", category, date, interval_ref
               FROM items
               WHERE owner = $1
               ORDER BY date DESC"#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let refs: Vec<Uuid> = items.iter().filter_map(|item| item.interval_ref).collect();
        let intervals = if refs.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, Interval>(
                "SELECT id, owner, name, days, date FROM intervals WHERE id = ANY($1)",
            )
            .bind(&refs)
            .fetch_all(&self.pool)
            .await?
        };
        let by_id: HashMap<Uuid, Interval> =
            intervals.into_iter().map(|interval| (interval.id, interval)).collect();

        Ok(items
            .into_iter()
            .map(|item| {
                let interval_ref = item.interval_ref.and_then(|id| by_id.get(&id).cloned());
                ResolvedItem::new(item, interval_ref)
            })
            .collect())
    }

    async fn create_item(&self, new: NewItem) -> Result<Item, StoreError> {
        let item = sqlx::query_as::<_, Item>(
            r#"INSERT INTO items (id, owner, name, done_num, category, date, interval_ref)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, owner, name, done_num, "interval", category, date, interval_ref"#,
        )
        .bind(Uuid::new_v4())
        .bind(new.owner)
        .bind(&new.name)
        .bind(new.done_num)
        .bind(&new.category)
        .bind(new.date)
        .bind(new.interval_ref)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update_item_fields(
        &self,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<Option<Item>, StoreError> {
        // Patches never clear a field, so a NULL bind can stand for "keep".
        let item = sqlx::query_as::<_, Item>(
            r#"UPDATE items
               SET name = COALESCE($2, name),
                   date = COALESCE($3, date),
                   done_num = COALESCE($4, done_num),
                   interval_ref = COALESCE($5, interval_ref),
                   category = COALESCE($6, category)
               WHERE id = $1
               RETURNING id, owner, name, done_num, "interval", category, date, interval_ref"#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.date)
        .bind(patch.done_num)
        .bind(patch.interval_ref)
        .bind(patch.category)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn resolve_item(&self, id: Uuid) -> Result<Option<ResolvedItem>, StoreError> {
        let item = match self.find_item(id).await? {
            Some(item) => item,
            None => return Ok(None),
        };

        let interval_ref = match item.interval_ref {
            Some(ref_id) => self.find_interval(ref_id).await?,
            None => None,
        };

        Ok(Some(ResolvedItem::new(item, interval_ref)))
    }
}

#[async_trait]
impl IntervalStore for PgStore {
    async fn find_interval(&self, id: Uuid) -> Result<Option<Interval>, StoreError> {
        let interval = sqlx::query_as::<_, Interval>(
            "SELECT id, owner, name, days, date FROM intervals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(interval)
    }

    async fn intervals_for_owner(&self, owner: Uuid) -> Result<Vec<Interval>, StoreError> {
        let intervals = sqlx::query_as::<_, Interval>(
            "SELECT id, owner, name, days, date
             FROM intervals
             WHERE owner = $1
             ORDER BY date DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(intervals)
    }

    async fn create_interval(&self, new: NewInterval) -> Result<Interval, StoreError> {
        let interval = sqlx::query_as::<_, Interval>(
            "INSERT INTO intervals (id, owner, name, days, date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, owner, name, days, date",
        )
        .bind(Uuid::new_v4())
        .bind(new.owner)
        .bind(&new.name)
        .bind(new.days)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(interval)
    }

    async fn delete_interval(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM intervals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
