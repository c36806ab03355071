//! Generated test data for a fresh store.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::ProfileDraft;
use crate::records::RecordStore;

/// Inserts `count` generated profiles, numbered from 1.
///
/// Stops at the first failed insert and returns how many were written.
pub async fn seed_profiles(store: &dyn RecordStore, count: usize) -> Result<usize> {
    let today = Utc::now().date_naive();

    for i in 1..=count {
        let draft = ProfileDraft {
            name: format!("User {}", i),
            email: format!("user{}@example.com", i),
            weight: 150 + i as i64,
            goal: "Maintain".to_string(),
            regimen: "Regular workout".to_string(),
            date_joined: today,
        };

        if let Err(e) = store.create(&draft).await {
            warn!(inserted = i - 1, error = %e, "seeding stopped early");
            return Err(e);
        }
    }

    info!("Seeded {} profiles", count);
    Ok(count)
}
