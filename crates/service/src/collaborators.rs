use entity::{contract, contract_manager};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Manager ids collaborating on the contract, distinct from the single
/// primary owner on the contract row itself.
pub async fn get_collaborators(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> ServiceResult<Vec<Uuid>> {
    ensure_contract_exists(db, contract_id).await?;
    let rows = contract_manager::Entity::find()
        .filter(contract_manager::Column::ContractId.eq(contract_id))
        .order_by_asc(contract_manager::Column::ManagerId)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| row.manager_id).collect())
}

/// Idempotent membership insert: adding an existing pair is a no-op.
pub async fn add_collaborator(
    db: &DatabaseConnection,
    contract_id: Uuid,
    manager_id: Uuid,
) -> ServiceResult<()> {
    ensure_contract_exists(db, contract_id).await?;
    insert_ignoring_duplicates(db, contract_id, &[manager_id]).await?;
    Ok(())
}

/// Replaces the whole collaborator set in one transaction: delete everything
/// for the contract, then insert the requested ids. An empty list yields an
/// empty set. Manager ids are not validated against the manager table;
/// orphan references are accepted.
pub async fn set_collaborators(
    db: &DatabaseConnection,
    contract_id: Uuid,
    manager_ids: &[Uuid],
) -> ServiceResult<()> {
    ensure_contract_exists(db, contract_id).await?;
    let txn = db.begin().await?;
    contract_manager::Entity::delete_many()
        .filter(contract_manager::Column::ContractId.eq(contract_id))
        .exec(&txn)
        .await?;
    insert_ignoring_duplicates(&txn, contract_id, manager_ids).await?;
    txn.commit().await?;
    Ok(())
}

async fn insert_ignoring_duplicates<C: sea_orm::ConnectionTrait>(
    db: &C,
    contract_id: Uuid,
    manager_ids: &[Uuid],
) -> ServiceResult<()> {
    if manager_ids.is_empty() {
        return Ok(());
    }
    let rows = manager_ids.iter().map(|manager_id| contract_manager::ActiveModel {
        contract_id: Set(contract_id),
        manager_id: Set(*manager_id),
    });
    contract_manager::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                contract_manager::Column::ContractId,
                contract_manager::Column::ManagerId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn ensure_contract_exists(db: &DatabaseConnection, contract_id: Uuid) -> ServiceResult<()> {
    contract::Entity::find_by_id(contract_id)
        .one(db)
        .await?
        .ok_or(ServiceError::ContractNotFound(contract_id))?;
    Ok(())
}
