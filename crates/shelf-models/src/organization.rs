//! Organization roles and permission check types
//!
//! Wire values match the database enum (`OrganizationRoles`) and the
//! lowercase action/entity names used by the permission matrix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unknown enum value coming from the database or a form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Role of a user inside an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationRoles {
    Admin,
    Owner,
    Base,
    SelfService,
}

impl OrganizationRoles {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationRoles::Admin => "ADMIN",
            OrganizationRoles::Owner => "OWNER",
            OrganizationRoles::Base => "BASE",
            OrganizationRoles::SelfService => "SELF_SERVICE",
        }
    }

    /// Admins and owners manage the whole workspace
    pub fn is_administrative(&self) -> bool {
        matches!(self, OrganizationRoles::Admin | OrganizationRoles::Owner)
    }
}

impl fmt::Display for OrganizationRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationRoles {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(OrganizationRoles::Admin),
            "OWNER" => Ok(OrganizationRoles::Owner),
            "BASE" => Ok(OrganizationRoles::Base),
            "SELF_SERVICE" => Ok(OrganizationRoles::SelfService),
            other => Err(ParseEnumError {
                kind: "OrganizationRoles",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
    Checkout,
    #[serde(rename = "checkin")]
    Checkin,
}

impl PermissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::Create => "create",
            PermissionAction::Read => "read",
            PermissionAction::Update => "update",
            PermissionAction::Delete => "delete",
            PermissionAction::Checkout => "checkout",
            PermissionAction::Checkin => "checkin",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionEntity {
    Asset,
    Booking,
    Location,
}

impl PermissionEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionEntity::Asset => "asset",
            PermissionEntity::Booking => "booking",
            PermissionEntity::Location => "location",
        }
    }
}

impl fmt::Display for PermissionEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of a permission check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckProps {
    pub organization_id: String,
    #[serde(default)]
    pub roles: Option<Vec<OrganizationRoles>>,
    pub user_id: String,
    pub action: PermissionAction,
    pub entity: PermissionEntity,
}
