//! Request DTOs for the profile API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::profile::{parse_date, ProfileDraft};

/// Request body for create (POST) and update (PUT).
///
/// `date_joined` arrives as a string so a malformed date is reported as
/// invalid input instead of a generic JSON rejection. A client-supplied `id`
/// is accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePayload {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub regimen: String,
    pub date_joined: String,
}

impl ProfilePayload {
    /// Validates the payload into a draft ready for the store.
    pub fn into_draft(self) -> Result<ProfileDraft> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidInput("name cannot be empty".to_string()));
        }
        if self.weight < 0 {
            return Err(Error::InvalidInput("weight cannot be negative".to_string()));
        }
        let date_joined = parse_date(&self.date_joined).map_err(|_| {
            Error::InvalidInput(format!(
                "date_joined must be YYYY-MM-DD, got {:?}",
                self.date_joined
            ))
        })?;

        Ok(ProfileDraft {
            name,
            email: self.email.trim().to_string(),
            weight: self.weight,
            goal: self.goal,
            regimen: self.regimen,
            date_joined,
        })
    }
}

/// Query string for the listing endpoint.
///
/// Both values are kept raw; anything that is not an integer is treated as
/// absent and replaced by a default downstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Option<i64> {
        parse_int(self.page.as_deref())
    }

    pub fn page_size(&self) -> Option<i64> {
        parse_int(self.page_size.as_deref())
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse().ok())
}
