use chrono::{Duration, Utc};
use entity::{app_user, business_area, contract, manager};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::sweep::SYSTEM_USERNAME;

pub struct SeededRecords {
    pub business_areas: Vec<business_area::Model>,
    pub managers: Vec<manager::Model>,
    pub users: Vec<app_user::Model>,
    pub contracts: Vec<contract::Model>,
}

impl SeededRecords {
    pub fn user_named(&self, username: &str) -> Option<&app_user::Model> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn manager_named(&self, name: &str) -> Option<&manager::Model> {
        self.managers.iter().find(|m| m.name == name)
    }

    pub fn contract_numbered(&self, number: &str) -> Option<&contract::Model> {
        self.contracts.iter().find(|c| c.contract_number == number)
    }
}

/// Demo dataset: two business areas, two managers, an admin account, one
/// manager-scoped account, the reserved system account, and contracts across
/// the status lifecycle, including one already overdue so the first sweep
/// has work to do.
pub async fn seed_demo(db: &DatabaseConnection) -> ServiceResult<SeededRecords> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let today = Utc::now().date_naive();

    let mut business_areas = Vec::new();
    for name in ["Infrastructure", "Consulting"] {
        let area = business_area::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await?;
        business_areas.push(area);
    }

    let mut managers = Vec::new();
    for (name, email) in [
        ("Dana Reyes", "dana@contracthub.test"),
        ("Priya Shah", "priya@contracthub.test"),
    ] {
        let record = manager::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(Some(email.to_string())),
            created_at: Set(now),
        }
        .insert(db)
        .await?;
        managers.push(record);
    }

    let mut users = Vec::new();
    let accounts = [
        ("admin", app_user::Role::Admin, None),
        ("dana", app_user::Role::Manager, Some(managers[0].id)),
        (SYSTEM_USERNAME, app_user::Role::Admin, None),
    ];
    for (username, role, manager_id) in accounts {
        let record = app_user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            role: Set(role),
            manager_id: Set(manager_id),
            is_active: Set(true),
            created_at: Set(now),
        }
        .insert(db)
        .await?;
        users.push(record);
    }

    let mut contracts = Vec::new();
    let specs = [
        (
            "CN-1001",
            "ACME Industrial",
            contract::Status::Active,
            Some(today + Duration::days(90)),
            Some(managers[0].id),
        ),
        (
            "CN-1002",
            "Globex Logistics",
            contract::Status::Active,
            Some(today - Duration::days(10)),
            Some(managers[0].id),
        ),
        (
            "CN-1003",
            "Initech Services",
            contract::Status::Draft,
            None,
            Some(managers[1].id),
        ),
        (
            "CN-1004",
            "Umbrella Holdings",
            contract::Status::Cancelled,
            Some(today + Duration::days(30)),
            None,
        ),
    ];
    for (number, customer, status, end_date, manager_id) in specs {
        let record = contract::ActiveModel {
            id: Set(Uuid::new_v4()),
            contract_number: Set(number.to_string()),
            customer_name: Set(customer.to_string()),
            wbs_code: Set(None),
            project_name: Set(None),
            business_area_id: Set(business_areas[0].id),
            manager_id: Set(manager_id),
            start_date: Set(today - Duration::days(180)),
            end_date: Set(end_date),
            status: Set(status),
            created_at: Set(now),
        }
        .insert(db)
        .await?;
        contracts.push(record);
    }

    Ok(SeededRecords {
        business_areas,
        managers,
        users,
        contracts,
    })
}
