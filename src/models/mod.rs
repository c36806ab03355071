//! Profile record types and the request/response DTOs of the HTTP surface.

pub mod profile;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use profile::{LinkedProfile, Profile, ProfileDraft, ProfileLinks};
pub use requests::{PageQuery, ProfilePayload};
pub use responses::{
    DeleteResponse, ErrorResponse, HealthResponse, ProfilePage, StatsResponse,
};
