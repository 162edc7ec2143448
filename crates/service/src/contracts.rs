use chrono::{NaiveDate, Utc};
use entity::{business_area, contract, contract_history, manager};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::scope::{AccessScope, CurrentUser};

#[derive(Clone, Debug, Deserialize)]
pub struct NewContract {
    pub contract_number: String,
    pub customer_name: String,
    pub wbs_code: Option<String>,
    pub project_name: Option<String>,
    pub business_area_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: contract::Status,
}

/// Full-replacement update payload. Every field is written; a status value
/// different from the stored one additionally produces a history row.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractUpdate {
    pub contract_number: String,
    pub customer_name: String,
    pub wbs_code: Option<String>,
    pub project_name: Option<String>,
    pub business_area_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: contract::Status,
}

pub async fn create_contract(
    db: &DatabaseConnection,
    input: NewContract,
) -> ServiceResult<contract::Model> {
    business_area::Entity::find_by_id(input.business_area_id)
        .one(db)
        .await?
        .ok_or(ServiceError::BusinessAreaNotFound(input.business_area_id))?;
    if let Some(manager_id) = input.manager_id {
        manager::Entity::find_by_id(manager_id)
            .one(db)
            .await?
            .ok_or(ServiceError::ManagerNotFound(manager_id))?;
    }
    let duplicate = contract::Entity::find()
        .filter(contract::Column::ContractNumber.eq(input.contract_number.clone()))
        .one(db)
        .await?;
    if duplicate.is_some() {
        return Err(ServiceError::DuplicateContractNumber(input.contract_number));
    }

    let now: DateTimeWithTimeZone = Utc::now().into();
    let model = contract::ActiveModel {
        id: Set(Uuid::new_v4()),
        contract_number: Set(input.contract_number),
        customer_name: Set(input.customer_name),
        wbs_code: Set(input.wbs_code),
        project_name: Set(input.project_name),
        business_area_id: Set(input.business_area_id),
        manager_id: Set(input.manager_id),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        status: Set(input.status),
        created_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn get_contract(db: &DatabaseConnection, id: Uuid) -> ServiceResult<contract::Model> {
    contract::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::ContractNotFound(id))
}

/// Applies all field changes inside one transaction. When the stored status
/// differs from the requested one, exactly one history row is written,
/// attributed to the acting user. No transition graph is enforced: any status
/// value is reachable from any other through this path.
pub async fn update_contract(
    db: &DatabaseConnection,
    id: Uuid,
    input: ContractUpdate,
    actor: &CurrentUser,
) -> ServiceResult<contract::Model> {
    let txn = db.begin().await?;
    let existing = contract::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::ContractNotFound(id))?;

    let previous_status = existing.status;
    let new_status = input.status;
    let now: DateTimeWithTimeZone = Utc::now().into();

    let mut active: contract::ActiveModel = existing.into();
    active.contract_number = Set(input.contract_number);
    active.customer_name = Set(input.customer_name);
    active.wbs_code = Set(input.wbs_code);
    active.project_name = Set(input.project_name);
    active.business_area_id = Set(input.business_area_id);
    active.manager_id = Set(input.manager_id);
    active.start_date = Set(input.start_date);
    active.end_date = Set(input.end_date);
    active.status = Set(new_status);
    let updated = active.update(&txn).await?;

    if previous_status != new_status {
        let history = contract_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            contract_id: Set(id),
            previous_status: Set(previous_status),
            new_status: Set(new_status),
            modified_by: Set(actor.id),
            modification_date: Set(now),
        };
        contract_history::Entity::insert(history)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(updated)
}

/// Idempotent: deleting an unknown id is not an error.
pub async fn delete_contract(db: &DatabaseConnection, id: Uuid) -> ServiceResult<()> {
    contract::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

/// Sets the single primary owner of the contract. Independent of the
/// collaborator set.
pub async fn assign_manager(
    db: &DatabaseConnection,
    contract_id: Uuid,
    manager_id: Uuid,
) -> ServiceResult<contract::Model> {
    let existing = contract::Entity::find_by_id(contract_id)
        .one(db)
        .await?
        .ok_or(ServiceError::ContractNotFound(contract_id))?;
    manager::Entity::find_by_id(manager_id)
        .one(db)
        .await?
        .ok_or(ServiceError::ManagerNotFound(manager_id))?;

    let mut active: contract::ActiveModel = existing.into();
    active.manager_id = Set(Some(manager_id));
    Ok(active.update(db).await?)
}

pub async fn list_contracts(
    db: &DatabaseConnection,
    scope: AccessScope,
) -> ServiceResult<Vec<contract::Model>> {
    list_filtered(db, scope, None).await
}

pub async fn list_by_status(
    db: &DatabaseConnection,
    status: contract::Status,
    scope: AccessScope,
) -> ServiceResult<Vec<contract::Model>> {
    list_filtered(db, scope, Some(status)).await
}

async fn list_filtered(
    db: &DatabaseConnection,
    scope: AccessScope,
    status: Option<contract::Status>,
) -> ServiceResult<Vec<contract::Model>> {
    let mut query = contract::Entity::find();
    match scope {
        AccessScope::Unrestricted => {}
        AccessScope::RestrictedTo(Some(manager_id)) => {
            query = query.filter(contract::Column::ManagerId.eq(manager_id));
        }
        // Fail closed: a manager account without a linked manager record
        // sees nothing, not everything.
        AccessScope::RestrictedTo(None) => return Ok(vec![]),
    }
    if let Some(status) = status {
        query = query.filter(contract::Column::Status.eq(status));
    }
    Ok(query
        .order_by_asc(contract::Column::ContractNumber)
        .all(db)
        .await?)
}
