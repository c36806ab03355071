//! API Module
//!
//! HTTP handlers and routing for the profile REST API.
//!
//! # Endpoints
//! - `GET {base}?page=&pageSize=` - One page of profiles with navigation links
//! - `POST {base}` - Create a profile
//! - `GET {base}/:id` - Fetch one profile through the cache
//! - `PUT {base}/:id` - Replace a profile
//! - `DELETE {base}/:id` - Delete a profile
//! - `GET /stats` - Read-path and cache backend statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
