//! User repository backed by the on-device SQLite cache

use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use sqlx::SqlitePool;
use tracing::{debug, error, info};

use crate::models::UserRecord;

/// Predicate used to select cached users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// Every cached user
    All,
    /// The user with this server identifier
    Id(i64),
    /// Users whose full name contains the needle, ignoring ASCII case
    NameContains(String),
}

/// User repository
///
/// Every mutating call is a single statement committed immediately, so a
/// reader never observes a partially written record.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the users table when it does not exist yet
    pub async fn init_schema(&self) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                local_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER UNIQUE,
                full_name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                profile_pic_url TEXT NOT NULL DEFAULT '',
                phone TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                birth_date TEXT NOT NULL DEFAULT '',
                gender TEXT NOT NULL DEFAULT '',
                designation TEXT NOT NULL DEFAULT '',
                salary INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL DEFAULT '',
                cached_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::Migration(format!("Failed to create users table: {}", e)))?;

        info!("User store schema ready");
        Ok(())
    }

    /// Insert the record, or overwrite every field of the record sharing its `id`
    ///
    /// A record without `id` cannot be matched and is always inserted.
    pub async fn upsert(&self, record: &UserRecord) -> DatabaseResult<()> {
        debug!("Upserting user {:?}", record.id);

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, full_name, email, profile_pic_url, phone, address,
                birth_date, gender, designation, salary, created_at, updated_at, cached_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                full_name = excluded.full_name,
                email = excluded.email,
                profile_pic_url = excluded.profile_pic_url,
                phone = excluded.phone,
                address = excluded.address,
                birth_date = excluded.birth_date,
                gender = excluded.gender,
                designation = excluded.designation,
                salary = excluded.salary,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                cached_at = excluded.cached_at
            "#,
        )
        .bind(record.id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(&record.profile_pic_url)
        .bind(&record.phone)
        .bind(&record.address)
        .bind(&record.birth_date)
        .bind(&record.gender)
        .bind(&record.designation)
        .bind(record.salary)
        .bind(&record.created_at)
        .bind(&record.updated_at)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Could not save user {:?}: {}", record.id, e);
            DatabaseError::Query(e)
        })?;

        Ok(())
    }

    /// Get every cached user in storage order
    pub async fn fetch_all(&self) -> DatabaseResult<Vec<UserRecord>> {
        self.fetch_matching(&UserFilter::All).await
    }

    /// Get the cached users selected by `filter`, in storage order
    pub async fn fetch_matching(&self, filter: &UserFilter) -> DatabaseResult<Vec<UserRecord>> {
        let rows = match filter {
            UserFilter::All => {
                sqlx::query_as::<_, UserRecord>(
                    r#"
                    SELECT user_id, full_name, email, profile_pic_url, phone, address,
                           birth_date, gender, designation, salary, created_at, updated_at
                    FROM users
                    ORDER BY local_id
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
            UserFilter::Id(id) => {
                sqlx::query_as::<_, UserRecord>(
                    r#"
                    SELECT user_id, full_name, email, profile_pic_url, phone, address,
                           birth_date, gender, designation, salary, created_at, updated_at
                    FROM users
                    WHERE user_id = ?
                    ORDER BY local_id
                    "#,
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await
            }
            UserFilter::NameContains(needle) => {
                sqlx::query_as::<_, UserRecord>(
                    r#"
                    SELECT user_id, full_name, email, profile_pic_url, phone, address,
                           birth_date, gender, designation, salary, created_at, updated_at
                    FROM users
                    WHERE instr(lower(full_name), lower(?)) > 0
                    ORDER BY local_id
                    "#,
                )
                .bind(needle)
                .fetch_all(&self.pool)
                .await
            }
        };

        rows.map_err(|e| {
            error!("Could not fetch users matching {:?}: {}", filter, e);
            DatabaseError::Query(e)
        })
    }

    /// Find a cached user by server identifier
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<UserRecord>> {
        let mut users = self.fetch_matching(&UserFilter::Id(id)).await?;
        Ok(users.pop())
    }

    /// Delete every cached user selected by `filter`, returning how many went away
    pub async fn delete(&self, filter: &UserFilter) -> DatabaseResult<u64> {
        let result = match filter {
            UserFilter::All => sqlx::query("DELETE FROM users").execute(&self.pool).await,
            UserFilter::Id(id) => {
                sqlx::query("DELETE FROM users WHERE user_id = ?")
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
            UserFilter::NameContains(needle) => {
                sqlx::query("DELETE FROM users WHERE instr(lower(full_name), lower(?)) > 0")
                    .bind(needle)
                    .execute(&self.pool)
                    .await
            }
        };

        let deleted = result
            .map_err(|e| {
                error!("Could not delete users matching {:?}: {}", filter, e);
                DatabaseError::Query(e)
            })?
            .rows_affected();

        info!("Deleted {} cached users matching {:?}", deleted, filter);
        Ok(deleted)
    }

    /// Number of cached users
    pub async fn count(&self) -> DatabaseResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// When the most recent write to the cache happened, if any
    pub async fn last_cached_at(&self) -> DatabaseResult<Option<DateTime<Utc>>> {
        let millis: Option<i64> = sqlx::query_scalar("SELECT MAX(cached_at) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(millis.and_then(DateTime::from_timestamp_millis))
    }
}
