//! Permission system for Shelf RS
//!
//! Role-based access control for organization members.

use shelf_core::{ShelfError, ShelfResult};
use shelf_models::{OrganizationRoles, PermissionAction, PermissionCheckProps, PermissionEntity};

/// Whether a single role grants `action` on `entity`
fn role_allows(role: OrganizationRoles, action: PermissionAction, entity: PermissionEntity) -> bool {
    use PermissionAction::*;
    use PermissionEntity::*;

    if role.is_administrative() {
        return true;
    }

    // Base and self-service members
    match entity {
        Asset | Location => action == Read,
        Booking => matches!(action, Create | Read | Update | Checkout | Checkin),
    }
}

/// Check a permission against the roles the user holds in the organization
pub fn validate_permission(props: &PermissionCheckProps) -> bool {
    props
        .roles
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|role| role_allows(*role, props.action, props.entity))
}

/// Like [`validate_permission`], failing with `Forbidden`
pub fn require_permission(props: &PermissionCheckProps) -> ShelfResult<()> {
    if validate_permission(props) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %props.user_id,
            organization_id = %props.organization_id,
            action = %props.action,
            entity = %props.entity,
            "Permission denied"
        );
        Err(ShelfError::forbidden(format!(
            "You are not allowed to {} this {}",
            props.action, props.entity
        )))
    }
}
