use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed key of the single household profile.
pub const HOUSEHOLD_PROFILE_ID: &str = "household";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub family_name: String,
    pub profile_picture: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(family_name: String, profile_picture: Option<String>) -> Self {
        Self {
            id: HOUSEHOLD_PROFILE_ID.to_string(),
            family_name,
            profile_picture,
            updated_at: Utc::now(),
        }
    }

    /// Applies an update: the name is always replaced, the picture only when
    /// a new one was supplied. Returns the picture key that was displaced.
    pub fn apply_update(
        &mut self,
        family_name: String,
        new_picture: Option<String>,
    ) -> Option<String> {
        self.family_name = family_name;
        self.updated_at = Utc::now();
        match new_picture {
            Some(picture) => self.profile_picture.replace(picture),
            None => None,
        }
    }
}
