use entity::app_user;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Visibility restriction derived from the caller's identity. Every contract
/// read path takes one of these; nothing in the service layer consults
/// ambient request state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessScope {
    Unrestricted,
    /// Restricted to contracts owned by the given manager. `None` means the
    /// account has no linked manager record and matches nothing.
    RestrictedTo(Option<Uuid>),
}

impl AccessScope {
    pub fn permits(&self, contract_manager_id: Option<Uuid>) -> bool {
        match self {
            AccessScope::Unrestricted => true,
            AccessScope::RestrictedTo(Some(id)) => contract_manager_id == Some(*id),
            AccessScope::RestrictedTo(None) => false,
        }
    }
}

/// Caller identity resolved once per operation and passed down explicitly.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: app_user::Role,
    pub manager_id: Option<Uuid>,
}

impl CurrentUser {
    pub fn scope(&self) -> AccessScope {
        match self.role {
            app_user::Role::Admin => AccessScope::Unrestricted,
            app_user::Role::Manager => AccessScope::RestrictedTo(self.manager_id),
        }
    }
}

/// Looks up the user record for an authenticated username and derives its
/// scope. A missing username (unauthenticated call) and a deactivated
/// account fail with `IdentityNotFound`; a username with no user record
/// fails with `UserNotFound`.
pub async fn resolve_current_user<C: ConnectionTrait>(
    db: &C,
    username: Option<&str>,
) -> ServiceResult<CurrentUser> {
    let username = username.ok_or(ServiceError::IdentityNotFound)?;
    let user = app_user::Entity::find()
        .filter(app_user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?;
    if !user.is_active {
        return Err(ServiceError::IdentityNotFound);
    }
    Ok(CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
        manager_id: user.manager_id,
    })
}

pub async fn resolve_scope<C: ConnectionTrait>(
    db: &C,
    username: Option<&str>,
) -> ServiceResult<AccessScope> {
    Ok(resolve_current_user(db, username).await?.scope())
}
