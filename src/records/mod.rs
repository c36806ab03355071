//! Durable profile storage
//!
//! `RecordStore` is the CRUD contract over the relational backing store.
//! `SqliteRecordStore` implements it with sqlx.

mod seed;
mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Profile, ProfileDraft};

pub use seed::seed_profiles;
pub use sqlite::SqliteRecordStore;

// == Record Store Trait ==
/// CRUD operations keyed by the store-assigned integer identifier.
///
/// `get_by_id` and `update` report a missing row as `Error::NotFound`; every
/// other database problem is `Error::StoreFailure`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a profile and returns its new identifier.
    async fn create(&self, draft: &ProfileDraft) -> Result<i64>;

    async fn get_by_id(&self, id: i64) -> Result<Profile>;

    async fn update(&self, id: i64, draft: &ProfileDraft) -> Result<()>;

    /// Deleting an absent identifier succeeds.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Up to `limit` profiles after skipping `offset`, ordered by id, plus
    /// the total row count.
    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Profile>, i64)>;

    async fn count(&self) -> Result<i64>;
}
