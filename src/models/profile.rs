//! Profile record and its derived hypermedia links.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire and storage format of `date_joined`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// == Profile ==
/// A subject profile as held by the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Assigned by the store on create
    pub id: i64,
    pub name: String,
    pub email: String,
    pub weight: i64,
    pub goal: String,
    pub regimen: String,
    #[serde(with = "iso_date")]
    pub date_joined: NaiveDate,
}

impl Profile {
    /// Builds a stored profile from a draft and the identifier the store assigned.
    pub fn from_draft(id: i64, draft: ProfileDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            weight: draft.weight,
            goal: draft.goal,
            regimen: draft.regimen,
            date_joined: draft.date_joined,
        }
    }

    /// Attaches the self/update/delete links rooted at `base`.
    pub fn with_links(self, base: &str) -> LinkedProfile {
        let links = ProfileLinks::for_id(base, self.id);
        LinkedProfile {
            profile: self,
            links,
        }
    }
}

// == Profile Draft ==
/// Validated profile fields without an identifier, used for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub weight: i64,
    pub goal: String,
    pub regimen: String,
    pub date_joined: NaiveDate,
}

// == Links ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub update: String,
    pub delete: String,
}

impl ProfileLinks {
    pub fn for_id(base: &str, id: i64) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            self_link: format!("{}/{}", base, id),
            update: format!("{}/{}/update", base, id),
            delete: format!("{}/{}/delete", base, id),
        }
    }
}

/// A profile together with its links, as handed to API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub links: ProfileLinks,
}

/// Parses an ISO `YYYY-MM-DD` string.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

/// Serde adapter keeping `date_joined` as a `YYYY-MM-DD` string on the wire.
mod iso_date {
    use chrono::NaiveDate;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::{parse_date, DATE_FORMAT};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(|e| D::Error::custom(format!("invalid date {:?}: {}", raw, e)))
    }
}
