// client/src/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::Document;

/// Collection holding one profile document per account, keyed by uid.
pub const USERS_COLLECTION: &str = "users";

/// Locally cached view of the per-user profile document. Missing fields
/// decode to defaults rather than failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(skip)]
    pub uid: String,
    pub pseudo: String,
    pub email: String,
    #[serde(rename = "profilePhoto")]
    pub profile_photo_url: Option<String>,
    #[serde(rename = "totalViews")]
    pub total_views: i64,
    #[serde(rename = "totalDownloads")]
    pub total_downloads: i64,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn from_document(uid: &str, fields: Document) -> Result<UserProfile, serde_json::Error> {
        let mut profile: UserProfile =
            serde_json::from_value(serde_json::Value::Object(fields))?;
        profile.uid = uid.to_string();
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_fields_decode_to_defaults() {
        let profile = UserProfile::from_document(
            "u1",
            doc(json!({ "pseudo": "Al", "email": "a@x.com" })),
        )
        .unwrap();
        assert_eq!(profile.uid, "u1");
        assert_eq!(profile.pseudo, "Al");
        assert_eq!(profile.total_views, 0);
        assert_eq!(profile.total_downloads, 0);
        assert!(profile.profile_photo_url.is_none());
    }

    #[test]
    fn photo_and_stats_round_through() {
        let profile = UserProfile::from_document(
            "u2",
            doc(json!({
                "pseudo": "Bea",
                "email": "b@y.com",
                "profilePhoto": "https://cdn/u2",
                "totalViews": 12,
                "totalDownloads": 3,
            })),
        )
        .unwrap();
        assert_eq!(profile.profile_photo_url.as_deref(), Some("https://cdn/u2"));
        assert_eq!(profile.total_views, 12);
        assert_eq!(profile.total_downloads, 3);
    }
}
