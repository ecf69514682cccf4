//! Object key derivation
//!
//! The key is the only index the gateway has: it is rebuilt from the same
//! request fields on upload and on link issuance, so both sides must agree on
//! the exact layout. Field values are not format-checked and identical fields
//! always map to the same key, so a later upload overwrites an earlier one.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{form::FromUploadForm, InputError, UploadForm};

const USER_PROFILE_SUFFIX: &str = "userProfile";
const GROUP_PROFILE_SUFFIX: &str = "groupProfile";
const PUNISH_SUFFIX: &str = "punish";

/// Fields identifying a user's profile picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfileFields {
    pub user_id: String,
    pub user_sns: String,
}

/// Fields identifying a group's profile picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupProfileFields {
    pub group_id: String,
}

/// Fields identifying evidence attached to a punishment in a group feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunishFeedFields {
    pub user_id: String,
    pub user_sns: String,
    pub group_id: String,
    pub punish_id: String,
}

impl FromUploadForm for UserProfileFields {
    fn from_form(form: &UploadForm) -> Result<Self, InputError> {
        Ok(Self {
            user_id: form.require("userId")?,
            user_sns: form.require("userSns")?,
        })
    }
}

impl FromUploadForm for GroupProfileFields {
    fn from_form(form: &UploadForm) -> Result<Self, InputError> {
        Ok(Self {
            group_id: form.require("groupId")?,
        })
    }
}

impl FromUploadForm for PunishFeedFields {
    fn from_form(form: &UploadForm) -> Result<Self, InputError> {
        Ok(Self {
            user_id: form.require("userId")?,
            user_sns: form.require("userSns")?,
            group_id: form.require("groupId")?,
            punish_id: form.require("punishId")?,
        })
    }
}

/// What an object represents, and therefore where it is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    /// A configured literal key
    Fixed(String),
    /// `{userId}_{userSns}_userProfile`
    UserProfile(UserProfileFields),
    /// `{groupId}_groupProfile`
    GroupProfile(GroupProfileFields),
    /// `{userId}_{userSns}_{groupId}_{punishId}_punish`
    PunishFeed(PunishFeedFields),
}

impl ImageTarget {
    #[must_use]
    pub fn object_key(&self) -> String {
        match self {
            Self::Fixed(key) => key.clone(),
            Self::UserProfile(f) => {
                format!("{}_{}_{USER_PROFILE_SUFFIX}", f.user_id, f.user_sns)
            }
            Self::GroupProfile(f) => format!("{}_{GROUP_PROFILE_SUFFIX}", f.group_id),
            Self::PunishFeed(f) => format!(
                "{}_{}_{}_{}_{PUNISH_SUFFIX}",
                f.user_id, f.user_sns, f.group_id, f.punish_id
            ),
        }
    }
}

/// Selects which key layout a link request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ImageReason {
    UserProfile,
    GroupProfile,
    PunishFeed,
}

/// Query parameters for issuing a download link
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinkQuery {
    /// Which kind of image is requested
    pub reason: ImageReason,
    /// Required for `user-profile` and `punish-feed`
    #[validate(length(min = 1))]
    pub user_id: Option<String>,
    /// Required for `user-profile` and `punish-feed`
    #[validate(length(min = 1))]
    pub user_sns: Option<String>,
    /// Required for `group-profile` and `punish-feed`
    #[validate(length(min = 1))]
    pub group_id: Option<String>,
    /// Required for `punish-feed`
    #[validate(length(min = 1))]
    pub punish_id: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, InputError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(InputError::MissingField(name))
}

impl TryFrom<ImageLinkQuery> for ImageTarget {
    type Error = InputError;

    fn try_from(query: ImageLinkQuery) -> Result<Self, Self::Error> {
        Ok(match query.reason {
            ImageReason::UserProfile => Self::UserProfile(UserProfileFields {
                user_id: required(query.user_id, "userId")?,
                user_sns: required(query.user_sns, "userSns")?,
            }),
            ImageReason::GroupProfile => Self::GroupProfile(GroupProfileFields {
                group_id: required(query.group_id, "groupId")?,
            }),
            ImageReason::PunishFeed => Self::PunishFeed(PunishFeedFields {
                user_id: required(query.user_id, "userId")?,
                user_sns: required(query.user_sns, "userSns")?,
                group_id: required(query.group_id, "groupId")?,
                punish_id: required(query.punish_id, "punishId")?,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_query(reason: ImageReason) -> ImageLinkQuery {
        ImageLinkQuery {
            reason,
            user_id: None,
            user_sns: None,
            group_id: None,
            punish_id: None,
        }
    }

    #[test]
    fn test_user_profile_key() {
        let target = ImageTarget::UserProfile(UserProfileFields {
            user_id: "u1".to_string(),
            user_sns: "kakao".to_string(),
        });
        assert_eq!(target.object_key(), "u1_kakao_userProfile");
    }

    #[test]
    fn test_group_profile_key() {
        let target = ImageTarget::GroupProfile(GroupProfileFields {
            group_id: "g7".to_string(),
        });
        assert_eq!(target.object_key(), "g7_groupProfile");
    }

    #[test]
    fn test_punish_feed_key() {
        let target = ImageTarget::PunishFeed(PunishFeedFields {
            user_id: "u1".to_string(),
            user_sns: "naver".to_string(),
            group_id: "g7".to_string(),
            punish_id: "p3".to_string(),
        });
        assert_eq!(target.object_key(), "u1_naver_g7_p3_punish");
    }

    #[test]
    fn test_fixed_key_is_verbatim() {
        assert_eq!(ImageTarget::Fixed("img.png".to_string()).object_key(), "img.png");
    }

    #[test]
    fn test_fields_are_not_format_checked() {
        let target = ImageTarget::UserProfile(UserProfileFields {
            user_id: "a_b".to_string(),
            user_sns: "한글 sns".to_string(),
        });
        assert_eq!(target.object_key(), "a_b_한글 sns_userProfile");
    }

    #[test]
    fn test_link_query_to_target() {
        let query = ImageLinkQuery {
            user_id: Some("u1".to_string()),
            user_sns: Some("kakao".to_string()),
            ..link_query(ImageReason::UserProfile)
        };
        let target = ImageTarget::try_from(query).unwrap();
        assert_eq!(target.object_key(), "u1_kakao_userProfile");
    }

    #[test]
    fn test_link_query_ignores_unrelated_fields() {
        let query = ImageLinkQuery {
            user_id: Some("u1".to_string()),
            group_id: Some("g7".to_string()),
            ..link_query(ImageReason::GroupProfile)
        };
        let target = ImageTarget::try_from(query).unwrap();
        assert_eq!(target.object_key(), "g7_groupProfile");
    }

    #[test]
    fn test_link_query_missing_field() {
        let query = ImageLinkQuery {
            user_id: Some("u1".to_string()),
            user_sns: Some("kakao".to_string()),
            group_id: Some("g7".to_string()),
            ..link_query(ImageReason::PunishFeed)
        };
        assert_eq!(
            ImageTarget::try_from(query),
            Err(InputError::MissingField("punishId"))
        );
    }

    #[test]
    fn test_link_query_empty_field_is_missing() {
        let query = ImageLinkQuery {
            group_id: Some(String::new()),
            ..link_query(ImageReason::GroupProfile)
        };
        assert_eq!(
            ImageTarget::try_from(query),
            Err(InputError::MissingField("groupId"))
        );
    }

    #[test]
    fn test_reason_wire_names() {
        let reason: ImageReason = serde_json::from_str("\"punish-feed\"").unwrap();
        assert_eq!(reason, ImageReason::PunishFeed);
        assert!(serde_json::from_str::<ImageReason>("\"avatar\"").is_err());
    }
}
