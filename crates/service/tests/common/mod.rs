#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use entity::{app_user, business_area, contract, manager};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, Database, DatabaseBackend,
    DatabaseConnection, Statement,
};
use service::scope::CurrentUser;
use service::sweep::SYSTEM_USERNAME;
use uuid::Uuid;

pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    bootstrap_sqlite(&db).await;
    db
}

async fn bootstrap_sqlite(db: &DatabaseConnection) {
    let ddl = [
        r#"
        CREATE TABLE business_area (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE manager (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            created_at TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE app_user (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL,
            manager_id TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE contract (
            id TEXT PRIMARY KEY,
            contract_number TEXT NOT NULL UNIQUE,
            customer_name TEXT NOT NULL,
            wbs_code TEXT,
            project_name TEXT,
            business_area_id TEXT NOT NULL,
            manager_id TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT,
            status TEXT NOT NULL DEFAULT 'DRAFT',
            created_at TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE contract_history (
            id TEXT PRIMARY KEY,
            contract_id TEXT NOT NULL,
            previous_status TEXT NOT NULL,
            new_status TEXT NOT NULL,
            modified_by TEXT NOT NULL,
            modification_date TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE contract_manager (
            contract_id TEXT NOT NULL,
            manager_id TEXT NOT NULL,
            PRIMARY KEY (contract_id, manager_id)
        );
        "#,
    ];
    for statement in ddl {
        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            statement.to_owned(),
        ))
            .await
            .unwrap();
    }
}

pub async fn insert_business_area(db: &DatabaseConnection, name: &str) -> business_area::Model {
    business_area::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_manager(db: &DatabaseConnection, name: &str) -> manager::Model {
    let now: DateTimeWithTimeZone = Utc::now().into();
    manager::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(None),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    role: app_user::Role,
    manager_id: Option<Uuid>,
) -> app_user::Model {
    insert_user_with_active(db, username, role, manager_id, true).await
}

pub async fn insert_inactive_user(
    db: &DatabaseConnection,
    username: &str,
    role: app_user::Role,
) -> app_user::Model {
    insert_user_with_active(db, username, role, None, false).await
}

async fn insert_user_with_active(
    db: &DatabaseConnection,
    username: &str,
    role: app_user::Role,
    manager_id: Option<Uuid>,
    is_active: bool,
) -> app_user::Model {
    let now: DateTimeWithTimeZone = Utc::now().into();
    app_user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        role: Set(role),
        manager_id: Set(manager_id),
        is_active: Set(is_active),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_system_user(db: &DatabaseConnection) -> app_user::Model {
    insert_user(db, SYSTEM_USERNAME, app_user::Role::Admin, None).await
}

pub struct ContractSpec<'a> {
    pub number: &'a str,
    pub customer: &'a str,
    pub status: contract::Status,
    pub end_date: Option<NaiveDate>,
    pub manager_id: Option<Uuid>,
    pub business_area_id: Uuid,
}

pub async fn insert_contract(db: &DatabaseConnection, spec: ContractSpec<'_>) -> contract::Model {
    let now: DateTimeWithTimeZone = Utc::now().into();
    contract::ActiveModel {
        id: Set(Uuid::new_v4()),
        contract_number: Set(spec.number.to_string()),
        customer_name: Set(spec.customer.to_string()),
        wbs_code: Set(None),
        project_name: Set(None),
        business_area_id: Set(spec.business_area_id),
        manager_id: Set(spec.manager_id),
        start_date: Set(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        end_date: Set(spec.end_date),
        status: Set(spec.status),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub fn current_user_for(user: &app_user::Model) -> CurrentUser {
    CurrentUser {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
        manager_id: user.manager_id,
    }
}
