use crate::models::Profile;
use serde::{Deserialize, Serialize};

/// Profile as seen by clients. A missing picture is rendered as `""`.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub family_name: String,
    pub profile_picture: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            family_name: profile.family_name,
            profile_picture: profile.profile_picture.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub profile: ProfileResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shape_is_empty_strings() {
        let json = serde_json::to_value(ProfileResponse::default()).unwrap();

        assert_eq!(json, serde_json::json!({ "familyName": "", "profilePicture": "" }));
    }
}
