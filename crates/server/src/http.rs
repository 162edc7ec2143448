use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::json;
use service::contracts::{ContractUpdate, NewContract};
use service::search::SearchQuery;
use service::stats::ContractStats;
use service::{AccessScope, CurrentUser, ServiceError, SystemClock};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{authenticated_username, AuthConfig};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub auth: Arc<AuthConfig>,
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(
            "/api/contracts",
            get(list_contracts).post(create_contract),
        )
        .route("/api/contracts/search", get(search_contracts))
        .route("/api/contracts/stats", get(contract_stats))
        .route("/api/contracts/status/{status}", get(list_by_status))
        .route(
            "/api/contracts/{id}",
            get(get_contract).put(update_contract).delete(delete_contract),
        )
        .route(
            "/api/contracts/{id}/manager/{manager_id}",
            axum::routing::put(assign_manager),
        )
        .route(
            "/api/contracts/{id}/collaborators",
            get(get_collaborators).put(set_collaborators),
        )
        .route("/api/contracts/{id}/history", get(contract_history))
        .route("/api/history", get(all_history))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ServiceError::ContractNotFound(_)
            | ServiceError::ManagerNotFound(_)
            | ServiceError::UserNotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            ServiceError::IdentityNotFound => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            ServiceError::AccessDenied => (StatusCode::FORBIDDEN, self.0.to_string()),
            ServiceError::DuplicateContractNumber(_) => (StatusCode::CONFLICT, self.0.to_string()),
            ServiceError::BusinessAreaNotFound(_) | ServiceError::InvalidStatus(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            ServiceError::Db(err) => {
                tracing::error!("database error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let username = authenticated_username(headers, &state.auth);
    Ok(service::scope::resolve_current_user(state.db.as_ref(), username.as_deref()).await?)
}

async fn caller_scope(state: &AppState, headers: &HeaderMap) -> Result<AccessScope, ApiError> {
    Ok(current_user(state, headers).await?.scope())
}

fn parse_status(raw: &str) -> Result<entity::contract::Status, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(ServiceError::InvalidStatus(raw.to_string())))
}

#[derive(Serialize)]
struct ContractDto {
    id: Uuid,
    contract_number: String,
    customer_name: String,
    wbs_code: Option<String>,
    project_name: Option<String>,
    business_area_id: Uuid,
    manager_id: Option<Uuid>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    status: &'static str,
    created_at: DateTime<Utc>,
}

impl From<entity::contract::Model> for ContractDto {
    fn from(model: entity::contract::Model) -> Self {
        Self {
            id: model.id,
            contract_number: model.contract_number,
            customer_name: model.customer_name,
            wbs_code: model.wbs_code,
            project_name: model.project_name,
            business_area_id: model.business_area_id,
            manager_id: model.manager_id,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.as_str(),
            created_at: model.created_at.into(),
        }
    }
}

#[derive(Serialize)]
struct HistoryDto {
    id: Uuid,
    contract_id: Uuid,
    previous_status: &'static str,
    new_status: &'static str,
    modified_by: Uuid,
    modification_date: DateTime<Utc>,
}

impl From<entity::contract_history::Model> for HistoryDto {
    fn from(model: entity::contract_history::Model) -> Self {
        Self {
            id: model.id,
            contract_id: model.contract_id,
            previous_status: model.previous_status.as_str(),
            new_status: model.new_status.as_str(),
            modified_by: model.modified_by,
            modification_date: model.modification_date.into(),
        }
    }
}

#[derive(Serialize)]
struct PageDto {
    items: Vec<ContractDto>,
    total: u64,
    page: u64,
    size: u64,
}

async fn create_contract(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<NewContract>,
) -> Result<(StatusCode, Json<ContractDto>), ApiError> {
    current_user(&state, &headers).await?;
    let created = service::contracts::create_contract(state.db.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn get_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractDto>, ApiError> {
    let found = service::contracts::get_contract(state.db.as_ref(), id).await?;
    Ok(Json(found.into()))
}

async fn update_contract(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<ContractUpdate>,
) -> Result<Json<ContractDto>, ApiError> {
    let actor = current_user(&state, &headers).await?;
    let updated = service::contracts::update_contract(state.db.as_ref(), id, input, &actor).await?;
    Ok(Json(updated.into()))
}

async fn delete_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::contracts::delete_contract(state.db.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_contracts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ContractDto>>, ApiError> {
    let scope = caller_scope(&state, &headers).await?;
    let found = service::contracts::list_contracts(state.db.as_ref(), scope).await?;
    Ok(Json(found.into_iter().map(Into::into).collect()))
}

async fn list_by_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(status): Path<String>,
) -> Result<Json<Vec<ContractDto>>, ApiError> {
    let scope = caller_scope(&state, &headers).await?;
    let status = parse_status(&status)?;
    let found = service::contracts::list_by_status(state.db.as_ref(), status, scope).await?;
    Ok(Json(found.into_iter().map(Into::into).collect()))
}

async fn search_contracts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<PageDto>, ApiError> {
    let scope = caller_scope(&state, &headers).await?;
    let page = service::search::search_contracts(state.db.as_ref(), query, scope).await?;
    Ok(Json(PageDto {
        items: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
        page: page.page,
        size: page.size,
    }))
}

async fn contract_stats(
    State(state): State<AppState>,
) -> Result<Json<ContractStats>, ApiError> {
    let stats = service::stats::contract_stats(state.db.as_ref(), &SystemClock).await?;
    Ok(Json(stats))
}

async fn assign_manager(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, manager_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ContractDto>, ApiError> {
    current_user(&state, &headers).await?;
    let updated = service::contracts::assign_manager(state.db.as_ref(), id, manager_id).await?;
    Ok(Json(updated.into()))
}

async fn get_collaborators(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let ids = service::collaborators::get_collaborators(state.db.as_ref(), id).await?;
    Ok(Json(ids))
}

async fn set_collaborators(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(manager_ids): Json<Vec<Uuid>>,
) -> Result<StatusCode, ApiError> {
    current_user(&state, &headers).await?;
    service::collaborators::set_collaborators(state.db.as_ref(), id, &manager_ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn contract_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<HistoryDto>>, ApiError> {
    let scope = caller_scope(&state, &headers).await?;
    let rows = service::history::get_history(state.db.as_ref(), Some(id), scope).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

async fn all_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<HistoryDto>>, ApiError> {
    let scope = caller_scope(&state, &headers).await?;
    let rows = service::history::get_history(state.db.as_ref(), None, scope).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
