mod common;

use chrono::{Duration, NaiveDate};
use common::{insert_business_area, insert_contract, insert_manager, setup, ContractSpec};
use entity::contract;
use sea_orm::DatabaseConnection;
use service::search::{search_contracts, SearchQuery, DEFAULT_PAGE_SIZE};
use service::stats::contract_stats;
use service::{AccessScope, FixedClock};
use uuid::Uuid;

async fn seed_search_data(db: &DatabaseConnection) -> (Uuid, Uuid) {
    let area = insert_business_area(db, "Infrastructure").await;
    let dana = insert_manager(db, "Dana Reyes").await;
    let rows = [
        ("CN-100", "ACME Industrial", contract::Status::Active, Some(dana.id)),
        ("CN-200", "Globex Logistics", contract::Status::Active, Some(dana.id)),
        ("CN-300", "Initech Services", contract::Status::Draft, None),
        ("CN-400", "acme consulting", contract::Status::Cancelled, None),
    ];
    for (number, customer, status, manager_id) in rows {
        insert_contract(
            db,
            ContractSpec {
                number,
                customer,
                status,
                end_date: None,
                manager_id,
                business_area_id: area.id,
            },
        )
        .await;
    }
    (dana.id, area.id)
}

fn query(term: Option<&str>, status: Option<&str>) -> SearchQuery {
    SearchQuery {
        term: term.map(str::to_string),
        status: status.map(str::to_string),
        page: None,
        size: None,
    }
}

#[tokio::test]
async fn term_matches_number_or_customer_case_insensitive() {
    let db = setup().await;
    seed_search_data(&db).await;

    let page = search_contracts(&db, query(Some("acme"), None), AccessScope::Unrestricted)
        .await
        .unwrap();
    let numbers: Vec<&str> = page.items.iter().map(|c| c.contract_number.as_str()).collect();
    assert_eq!(numbers, vec!["CN-100", "CN-400"]);

    let page = search_contracts(&db, query(Some("cn-2"), None), AccessScope::Unrestricted)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].contract_number, "CN-200");
}

#[tokio::test]
async fn term_and_status_filters_combine() {
    let db = setup().await;
    seed_search_data(&db).await;

    let page = search_contracts(
        &db,
        query(Some("acme"), Some("ACTIVE")),
        AccessScope::Unrestricted,
    )
    .await
    .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].contract_number, "CN-100");
}

#[tokio::test]
async fn unparsable_status_silently_disables_the_filter() {
    let db = setup().await;
    seed_search_data(&db).await;

    let bogus = search_contracts(
        &db,
        query(Some("acme"), Some("NOT_A_STATUS")),
        AccessScope::Unrestricted,
    )
    .await
    .unwrap();
    let unfiltered = search_contracts(&db, query(Some("acme"), None), AccessScope::Unrestricted)
        .await
        .unwrap();
    assert_eq!(bogus.total, unfiltered.total);
}

#[tokio::test]
async fn no_filters_returns_everything_ordered_by_number() {
    let db = setup().await;
    seed_search_data(&db).await;

    let page = search_contracts(&db, query(None, None), AccessScope::Unrestricted)
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.size, DEFAULT_PAGE_SIZE);
    let numbers: Vec<&str> = page.items.iter().map(|c| c.contract_number.as_str()).collect();
    assert_eq!(numbers, vec!["CN-100", "CN-200", "CN-300", "CN-400"]);
}

#[tokio::test]
async fn manager_scope_restricts_results() {
    let db = setup().await;
    let (dana_id, _) = seed_search_data(&db).await;

    let page = search_contracts(
        &db,
        query(None, None),
        AccessScope::RestrictedTo(Some(dana_id)),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|c| c.manager_id == Some(dana_id)));

    let other = search_contracts(
        &db,
        query(None, None),
        AccessScope::RestrictedTo(Some(Uuid::new_v4())),
    )
    .await
    .unwrap();
    assert_eq!(other.total, 0);
}

#[tokio::test]
async fn unlinked_manager_scope_gets_empty_page_not_error() {
    let db = setup().await;
    seed_search_data(&db).await;

    let page = search_contracts(&db, query(None, None), AccessScope::RestrictedTo(None))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn pagination_is_zero_indexed() {
    let db = setup().await;
    seed_search_data(&db).await;

    let first = search_contracts(
        &db,
        SearchQuery {
            term: None,
            status: None,
            page: Some(0),
            size: Some(2),
        },
        AccessScope::Unrestricted,
    )
    .await
    .unwrap();
    assert_eq!(first.total, 4);
    let numbers: Vec<&str> = first.items.iter().map(|c| c.contract_number.as_str()).collect();
    assert_eq!(numbers, vec!["CN-100", "CN-200"]);

    let second = search_contracts(
        &db,
        SearchQuery {
            term: None,
            status: None,
            page: Some(1),
            size: Some(2),
        },
        AccessScope::Unrestricted,
    )
    .await
    .unwrap();
    let numbers: Vec<&str> = second.items.iter().map(|c| c.contract_number.as_str()).collect();
    assert_eq!(numbers, vec!["CN-300", "CN-400"]);
}

#[tokio::test]
async fn stats_counts_expiring_window() {
    let db = setup().await;
    let area = insert_business_area(&db, "Infrastructure").await;
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let clock = FixedClock::at_date(today);

    let rows = [
        ("CN-1", contract::Status::Active, Some(today + Duration::days(10))),
        ("CN-2", contract::Status::Active, Some(today + Duration::days(30))),
        ("CN-3", contract::Status::Active, Some(today + Duration::days(31))),
        ("CN-4", contract::Status::Active, None),
        ("CN-5", contract::Status::Expired, Some(today - Duration::days(5))),
        ("CN-6", contract::Status::Draft, None),
    ];
    for (number, status, end_date) in rows {
        insert_contract(
            &db,
            ContractSpec {
                number,
                customer: "ACME Industrial",
                status,
                end_date,
                manager_id: None,
                business_area_id: area.id,
            },
        )
        .await;
    }

    let stats = contract_stats(&db, &clock).await.unwrap();
    assert_eq!(stats.total, 6);
    assert_eq!(stats.active, 4);
    assert_eq!(stats.expiring_soon, 2);
    assert_eq!(stats.expired, 1);
}
