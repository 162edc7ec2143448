use entity::{app_user, contract, contract_history};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ServiceResult;

/// Reserved account that sweep-driven history rows are attributed to.
pub const SYSTEM_USERNAME: &str = "system";

/// Whether the sweep should expire this contract today. The end-date boundary
/// is exclusive: a contract ending today stays active, and open-ended
/// contracts (no end date) never auto-expire.
pub fn is_overdue(model: &contract::Model, today: chrono::NaiveDate) -> bool {
    model.status == contract::Status::Active
        && model.end_date.map(|end| end < today).unwrap_or(false)
}

/// Expires every ACTIVE contract whose end date has passed, writing one
/// history row per transition. Runs once at startup and then daily; because
/// only ACTIVE contracts are considered, re-running is idempotent and never
/// duplicates history.
///
/// When the reserved system account is missing the transition still happens
/// but the audit row is skipped, leaving a gap in the history trail rather
/// than blocking the sweep.
pub async fn run_expiration_sweep(
    db: &DatabaseConnection,
    clock: &dyn Clock,
) -> ServiceResult<u64> {
    let today = clock.today();
    let system_actor = app_user::Entity::find()
        .filter(app_user::Column::Username.eq(SYSTEM_USERNAME))
        .one(db)
        .await?;
    if system_actor.is_none() {
        warn!(
            username = SYSTEM_USERNAME,
            "system account missing; expired contracts will not get history rows"
        );
    }

    let active = contract::Entity::find()
        .filter(contract::Column::Status.eq(contract::Status::Active))
        .all(db)
        .await?;

    let mut expired = 0u64;
    for model in active {
        if !is_overdue(&model, today) {
            continue;
        }
        expire_one(db, model, system_actor.as_ref(), clock).await?;
        expired += 1;
    }
    if expired > 0 {
        info!(count = expired, "expiration sweep transitioned contracts");
    }
    Ok(expired)
}

async fn expire_one(
    db: &DatabaseConnection,
    model: contract::Model,
    system_actor: Option<&app_user::Model>,
    clock: &dyn Clock,
) -> ServiceResult<()> {
    let contract_id = model.id;
    let previous_status = model.status;
    let now: DateTimeWithTimeZone = clock.now().into();

    let txn = db.begin().await?;
    let mut active: contract::ActiveModel = model.into();
    active.status = Set(contract::Status::Expired);
    active.update(&txn).await?;

    if let Some(actor) = system_actor {
        let history = contract_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            contract_id: Set(contract_id),
            previous_status: Set(previous_status),
            new_status: Set(contract::Status::Expired),
            modified_by: Set(actor.id),
            modification_date: Set(now),
        };
        contract_history::Entity::insert(history)
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;
    Ok(())
}
