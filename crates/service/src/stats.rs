use chrono::Duration;
use entity::contract;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use crate::clock::Clock;
use crate::error::ServiceResult;

pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 30;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct ContractStats {
    pub total: u64,
    pub active: u64,
    pub expiring_soon: u64,
    pub expired: u64,
}

/// Dashboard counters. Computed over the whole contract table, not scoped by
/// caller identity, unlike the other read paths (see DESIGN.md).
pub async fn contract_stats(
    db: &DatabaseConnection,
    clock: &dyn Clock,
) -> ServiceResult<ContractStats> {
    let today = clock.today();
    let horizon = today + Duration::days(EXPIRING_SOON_WINDOW_DAYS);

    let total = contract::Entity::find().count(db).await?;
    let active = contract::Entity::find()
        .filter(contract::Column::Status.eq(contract::Status::Active))
        .count(db)
        .await?;
    let expiring_soon = contract::Entity::find()
        .filter(contract::Column::Status.eq(contract::Status::Active))
        .filter(contract::Column::EndDate.between(today, horizon))
        .count(db)
        .await?;
    let expired = contract::Entity::find()
        .filter(contract::Column::Status.eq(contract::Status::Expired))
        .count(db)
        .await?;

    Ok(ContractStats {
        total,
        active,
        expiring_soon,
        expired,
    })
}
