//! API Handlers
//!
//! HTTP request handlers for the profile endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cached_store::CachedRecordStore;
use crate::error::{Error, Result};
use crate::models::{
    DeleteResponse, HealthResponse, LinkedProfile, PageQuery, Profile, ProfilePage,
    ProfilePayload, StatsResponse,
};
use crate::records::RecordStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<CachedRecordStore>,
}

impl AppState {
    pub fn new(profiles: CachedRecordStore) -> Self {
        Self {
            profiles: Arc::new(profiles),
        }
    }
}

/// Identifiers arrive as raw path text so a bad one is a 400, not a 404.
fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidInput(format!("invalid profile id: {:?}", raw)))
}

/// Handler for GET {base}
///
/// Unparseable `page` / `pageSize` values fall back to their defaults.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProfilePage>> {
    let page = state
        .profiles
        .list_paginated(query.page(), query.page_size())
        .await?;
    Ok(Json(page))
}

/// Handler for GET {base}/:id
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LinkedProfile>> {
    let id = parse_id(&id)?;
    let profile = state.profiles.get_by_id(id).await?;
    Ok(Json(profile.with_links(state.profiles.base_path())))
}

/// Handler for POST {base}
///
/// Malformed or incomplete JSON is reported as invalid input (400).
pub async fn create_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkedProfile>)> {
    let Json(payload) = payload?;
    let draft = payload.into_draft()?;
    let id = state.profiles.create(&draft).await?;
    let profile = Profile::from_draft(id, draft);
    Ok((
        StatusCode::CREATED,
        Json(profile.with_links(state.profiles.base_path())),
    ))
}

/// Handler for PUT {base}/:id
///
/// Any `id` in the body is ignored; the path wins. The reply echoes what was
/// written, never a cached copy.
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<Json<LinkedProfile>> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let draft = payload.into_draft()?;
    state.profiles.update(id, &draft).await?;
    let profile = Profile::from_draft(id, draft);
    Ok(Json(profile.with_links(state.profiles.base_path())))
}

/// Handler for DELETE {base}/:id
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&id)?;
    state.profiles.delete(id).await?;
    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let reads = state.profiles.read_stats();
    let backend = state.profiles.backend_stats().await;
    Json(StatsResponse::new(reads, backend))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::cached_store::CacheOptions;
    use crate::records::{seed_profiles, SqliteRecordStore};

    async fn seeded_state(count: usize) -> AppState {
        let store = Arc::new(SqliteRecordStore::open_in_memory().await.unwrap());
        seed_profiles(store.as_ref(), count).await.unwrap();
        let cached = CachedRecordStore::new(
            store,
            Arc::new(MemoryCache::new(100)),
            CacheOptions::default(),
        );
        AppState::new(cached)
    }

    fn payload(name: &str, date: &str) -> ProfilePayload {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "email": "ann@example.com",
            "weight": 140,
            "goal": "Cut",
            "regimen": "Running",
            "date_joined": date,
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("17").unwrap(), 17);
        assert!(matches!(parse_id("abc"), Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_get_handler_attaches_links() {
        let state = seeded_state(3).await;

        let response = get_handler(State(state), Path("2".to_string())).await.unwrap();
        assert_eq!(response.profile.name, "User 2");
        assert_eq!(response.links.update, "/users/2/update");
    }

    #[tokio::test]
    async fn test_get_handler_missing() {
        let state = seeded_state(1).await;

        let result = get_handler(State(state), Path("99".to_string())).await;
        assert!(matches!(result, Err(Error::NotFound(99))));
    }

    #[tokio::test]
    async fn test_list_handler_defaults() {
        let state = seeded_state(12).await;
        let query = PageQuery {
            page: None,
            page_size: Some("junk".to_string()),
        };

        let page = list_handler(State(state), Query(query)).await.unwrap();
        assert_eq!(page.records.len(), 10);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_create_and_update_handlers() {
        let state = seeded_state(0).await;

        let (status, created) = create_handler(State(state.clone()), Ok(Json(payload("Ann", "2024-01-05"))))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let id = created.profile.id;

        let updated = update_handler(
            State(state.clone()),
            Path(id.to_string()),
            Ok(Json(payload("Annie", "2024-01-05"))),
        )
        .await
        .unwrap();
        assert_eq!(updated.profile.name, "Annie");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_date() {
        let state = seeded_state(0).await;

        let result = create_handler(State(state), Ok(Json(payload("Ann", "05/01/2024")))).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = seeded_state(2).await;

        delete_handler(State(state.clone()), Path("1".to_string()))
            .await
            .unwrap();
        let result = get_handler(State(state), Path("1".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = seeded_state(1).await;
        get_handler(State(state.clone()), Path("1".to_string()))
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.reads.misses, 1);
        assert!(response.backend.is_some());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
