//! Asset, category and tag models
//!
//! Tables: "Asset", "Category", "Tag", "_AssetToTag"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::organization::ParseEnumError;
use crate::Id;

/// Number of tags shown inline in asset lists
pub const VISIBLE_TAG_COUNT: usize = 2;

/// Custody status of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    #[default]
    Available,
    InCustody,
    CheckedOut,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Available => "AVAILABLE",
            AssetStatus::InCustody => "IN_CUSTODY",
            AssetStatus::CheckedOut => "CHECKED_OUT",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(AssetStatus::Available),
            "IN_CUSTODY" => Ok(AssetStatus::InCustody),
            "CHECKED_OUT" => Ok(AssetStatus::CheckedOut),
            other => Err(ParseEnumError {
                kind: "AssetStatus",
                value: other.to_string(),
            }),
        }
    }
}

/// Asset entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    /// Signed URL of the main image
    pub main_image: Option<String>,
    /// When the signed `main_image` URL stops working
    pub main_image_expiration: Option<DateTime<Utc>>,
    pub status: AssetStatus,
    pub location_id: Option<Id>,
    pub category_id: Option<Id>,
    pub user_id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    /// Badge color, e.g. `#ab339f`
    pub color: String,
    pub user_id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub user_id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An asset row as shown in lists, with its category and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetListItem {
    #[serde(flatten)]
    pub asset: Asset,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}

impl AssetListItem {
    pub fn visible_tags(&self) -> &[Tag] {
        let end = self.tags.len().min(VISIBLE_TAG_COUNT);
        &self.tags[..end]
    }

    /// Count shown in the `+N` badge
    pub fn remaining_tag_count(&self) -> usize {
        self.tags.len().saturating_sub(VISIBLE_TAG_COUNT)
    }

    /// Tooltip listing the hidden tag names
    pub fn remaining_tags_title(&self) -> Option<String> {
        if self.remaining_tag_count() == 0 {
            return None;
        }
        let names: Vec<&str> = self.tags[VISIBLE_TAG_COUNT..]
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        Some(names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> Tag {
        let now = Utc::now();
        Tag {
            id: format!("tag_{}", name),
            name: name.to_string(),
            description: None,
            user_id: "u_1".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn item(tags: Vec<Tag>) -> AssetListItem {
        let now = Utc::now();
        AssetListItem {
            asset: Asset {
                id: "a_1".into(),
                title: "Drill".into(),
                description: None,
                main_image: None,
                main_image_expiration: None,
                status: AssetStatus::Available,
                location_id: Some("loc_1".into()),
                category_id: None,
                user_id: "u_1".into(),
                created_at: now,
                updated_at: now,
            },
            category: None,
            tags,
        }
    }

    #[test]
    fn test_tag_overflow() {
        let item = item(vec![tag("red"), tag("tools"), tag("heavy"), tag("new")]);
        assert_eq!(item.visible_tags().len(), 2);
        assert_eq!(item.remaining_tag_count(), 2);
        assert_eq!(item.remaining_tags_title().as_deref(), Some("heavy, new"));
    }

    #[test]
    fn test_few_tags() {
        let item = item(vec![tag("red")]);
        assert_eq!(item.visible_tags().len(), 1);
        assert_eq!(item.remaining_tag_count(), 0);
        assert!(item.remaining_tags_title().is_none());
    }

    #[test]
    fn test_list_item_serializes_flat() {
        let json = serde_json::to_value(item(vec![])).unwrap();
        assert_eq!(json["title"], "Drill");
        assert_eq!(json["status"], "AVAILABLE");
        assert_eq!(json["locationId"], "loc_1");
        assert!(json["category"].is_null());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("IN_CUSTODY".parse::<AssetStatus>().unwrap(), AssetStatus::InCustody);
        assert!("lost".parse::<AssetStatus>().is_err());
    }
}
