//! SQLite record store (sqlx)

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::models::profile::{parse_date, DATE_FORMAT};
use crate::models::{Profile, ProfileDraft};
use crate::records::RecordStore;

pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Opens a pool on `database_url` and bootstraps the schema.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        info!("Opening profile store at {}", database_url);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database.
    ///
    /// Each SQLite memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Underlying pool, for maintenance and tests.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                weight INTEGER NOT NULL,
                goal TEXT NOT NULL,
                regimen TEXT NOT NULL,
                date_joined TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, draft: &ProfileDraft) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (name, email, weight, goal, regimen, date_joined)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(draft.weight)
        .bind(&draft.goal)
        .bind(&draft.regimen)
        .bind(draft.date_joined.format(DATE_FORMAT).to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(name = %draft.name, error = %e, "insert failed");
            Error::from(e)
        })?;

        let id = result.last_insert_rowid();
        info!(id, name = %draft.name, "profile created");
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Profile> {
        debug!(id, "reading profile from store");
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, weight, goal, regimen, date_joined
            FROM profiles WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_profile(),
            None => Err(Error::NotFound(id)),
        }
    }

    async fn update(&self, id: i64, draft: &ProfileDraft) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET name = ?1, email = ?2, weight = ?3, goal = ?4, regimen = ?5, date_joined = ?6
            WHERE id = ?7
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(draft.weight)
        .bind(&draft.goal)
        .bind(&draft.regimen)
        .bind(draft.date_joined.format(DATE_FORMAT).to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }
        info!(id, "profile updated");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM profiles WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!(id, "profile deleted");
        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Profile>, i64)> {
        // Count and page come from one snapshot.
        let mut tx = self.pool.begin().await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&mut *tx)
            .await?;

        let rows: Vec<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, weight, goal, regimen, date_joined
            FROM profiles
            ORDER BY id ASC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let profiles = rows
            .into_iter()
            .map(ProfileRow::into_profile)
            .collect::<Result<Vec<_>>>()?;

        Ok((profiles, total))
    }

    async fn count(&self) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    name: String,
    email: String,
    weight: i64,
    goal: String,
    regimen: String,
    date_joined: String,
}

impl ProfileRow {
    /// The stored date is re-parsed on every read; garbage never leaves the store.
    fn into_profile(self) -> Result<Profile> {
        let date_joined = parse_date(&self.date_joined).map_err(|_| {
            error!(id = self.id, value = %self.date_joined, "stored date_joined is not ISO");
            Error::InvalidDateFormat {
                id: self.id,
                value: self.date_joined.clone(),
            }
        })?;

        Ok(Profile {
            id: self.id,
            name: self.name,
            email: self.email,
            weight: self.weight,
            goal: self.goal,
            regimen: self.regimen,
            date_joined,
        })
    }
}
