//! # shelf-services
//!
//! Business logic services for Shelf RS.
//!
//! Each service wraps one loader or action: it checks permissions and
//! contracts, calls the stores and shapes the result the handler returns.

pub mod dashboard;
pub mod locations;
pub mod users;

pub use dashboard::{DashboardData, DashboardService};
pub use locations::{DeleteLocationService, LocationPage, LocationPageService};
pub use users::{ReplaceProfilePictureService, UpdateUserService};

use shelf_auth::AuthSession;
use shelf_models::{PermissionAction, PermissionCheckProps, PermissionEntity};

/// Permission check input for the signed-in user
pub(crate) fn permission_props(
    user: &AuthSession,
    action: PermissionAction,
    entity: PermissionEntity,
) -> PermissionCheckProps {
    PermissionCheckProps {
        organization_id: user.organization_id.clone(),
        roles: Some(user.roles.clone()),
        user_id: user.user_id.clone(),
        action,
        entity,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};
    use shelf_auth::{AuthSession, Session};
    use shelf_models::{Asset, AssetListItem, AssetStatus, Location, OrganizationRoles, User};

    pub fn owner(user_id: &str) -> AuthSession {
        AuthSession::from(&Session::authenticated(user_id, "jane@example.com", 3600))
    }

    pub fn member(user_id: &str, role: OrganizationRoles) -> AuthSession {
        AuthSession::from(
            &Session::authenticated(user_id, "jane@example.com", 3600)
                .with_organization("org_1", vec![role]),
        )
    }

    pub fn location(id: &str, user_id: &str) -> Location {
        let now = Utc::now();
        Location {
            id: id.into(),
            name: "Garage".into(),
            description: Some("Back of the house".into()),
            address: None,
            image_id: None,
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn asset(id: &str, location_id: &str, created_at: DateTime<Utc>) -> AssetListItem {
        AssetListItem {
            asset: Asset {
                id: id.into(),
                title: format!("Asset {id}"),
                description: None,
                main_image: None,
                main_image_expiration: None,
                status: AssetStatus::Available,
                location_id: Some(location_id.into()),
                category_id: None,
                user_id: "u_1".into(),
                created_at,
                updated_at: created_at,
            },
            category: None,
            tags: vec![],
        }
    }

    pub fn user(id: &str, email: &str, username: &str) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            email: email.into(),
            username: username.into(),
            first_name: None,
            last_name: None,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        }
    }
}
