use entity::{contract, contract_history};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::scope::AccessScope;

/// Status-change audit trail, newest first. With a contract id the caller's
/// scope must cover that contract; without one a manager scope sees only
/// history of contracts it owns.
pub async fn get_history(
    db: &DatabaseConnection,
    contract_id: Option<Uuid>,
    scope: AccessScope,
) -> ServiceResult<Vec<contract_history::Model>> {
    match contract_id {
        Some(contract_id) => history_for_contract(db, contract_id, scope).await,
        None => history_for_scope(db, scope).await,
    }
}

async fn history_for_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
    scope: AccessScope,
) -> ServiceResult<Vec<contract_history::Model>> {
    let owner = contract::Entity::find_by_id(contract_id)
        .one(db)
        .await?
        .ok_or(ServiceError::ContractNotFound(contract_id))?
        .manager_id;
    if !scope.permits(owner) {
        return Err(ServiceError::AccessDenied);
    }
    Ok(contract_history::Entity::find()
        .filter(contract_history::Column::ContractId.eq(contract_id))
        .order_by_desc(contract_history::Column::ModificationDate)
        .all(db)
        .await?)
}

async fn history_for_scope(
    db: &DatabaseConnection,
    scope: AccessScope,
) -> ServiceResult<Vec<contract_history::Model>> {
    let mut query = contract_history::Entity::find();
    match scope {
        AccessScope::Unrestricted => {}
        AccessScope::RestrictedTo(Some(manager_id)) => {
            query = query
                .inner_join(contract::Entity)
                .filter(contract::Column::ManagerId.eq(manager_id));
        }
        AccessScope::RestrictedTo(None) => return Ok(vec![]),
    }
    Ok(query
        .order_by_desc(contract_history::Column::ModificationDate)
        .all(db)
        .await?)
}
