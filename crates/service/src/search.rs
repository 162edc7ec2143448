use entity::contract;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;

use crate::error::ServiceResult;
use crate::scope::AccessScope;

pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Free-text search request. `status` is carried as the raw caller-supplied
/// string: an unparsable value silently disables the status filter here,
/// while the strict status-listing endpoint rejects the same input.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct ContractPage {
    pub items: Vec<contract::Model>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl ContractPage {
    fn empty(page: u64, size: u64) -> Self {
        ContractPage {
            items: vec![],
            total: 0,
            page,
            size,
        }
    }
}

pub async fn search_contracts(
    db: &DatabaseConnection,
    query: SearchQuery,
    scope: AccessScope,
) -> ServiceResult<ContractPage> {
    let page = query.page.unwrap_or(0);
    let size = query.size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);

    let manager_filter = match scope {
        AccessScope::Unrestricted => None,
        AccessScope::RestrictedTo(Some(manager_id)) => Some(manager_id),
        // Fail closed, not an error: an empty page regardless of filters.
        AccessScope::RestrictedTo(None) => return Ok(ContractPage::empty(page, size)),
    };

    let mut select = contract::Entity::find();
    if let Some(manager_id) = manager_filter {
        select = select.filter(contract::Column::ManagerId.eq(manager_id));
    }
    if let Some(status) = parsed_status(query.status.as_deref()) {
        select = select.filter(contract::Column::Status.eq(status));
    }
    if let Some(term) = sanitize_term(query.term.as_deref()) {
        select = select.filter(term_condition(&term));
    }

    let paginator = select
        .order_by_asc(contract::Column::ContractNumber)
        .paginate(db, size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page).await?;
    Ok(ContractPage {
        items,
        total,
        page,
        size,
    })
}

fn term_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", term.to_lowercase());
    let number = Expr::expr(Func::lower(Expr::col(contract::Column::ContractNumber)));
    let customer = Expr::expr(Func::lower(Expr::col(contract::Column::CustomerName)));
    Condition::any()
        .add(number.like(pattern.clone()))
        .add(customer.like(pattern))
}

fn sanitize_term(term: Option<&str>) -> Option<String> {
    let trimmed = term?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parsed_status(raw: Option<&str>) -> Option<contract::Status> {
    raw.and_then(|value| value.parse::<contract::Status>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_status_filter_is_dropped() {
        assert_eq!(parsed_status(Some("NOT_A_STATUS")), None);
        assert_eq!(parsed_status(Some("ACTIVE")), Some(contract::Status::Active));
        assert_eq!(parsed_status(None), None);
    }

    #[test]
    fn blank_terms_are_treated_as_absent() {
        assert_eq!(sanitize_term(Some("   ")), None);
        assert_eq!(sanitize_term(None), None);
        assert_eq!(sanitize_term(Some(" CN-1 ")), Some("CN-1".to_string()));
    }
}
