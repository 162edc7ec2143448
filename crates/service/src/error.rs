use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("contract {0} not found")]
    ContractNotFound(Uuid),
    #[error("manager {0} not found")]
    ManagerNotFound(Uuid),
    #[error("business area {0} not found")]
    BusinessAreaNotFound(Uuid),
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("no authenticated identity")]
    IdentityNotFound,
    #[error("access denied")]
    AccessDenied,
    #[error("contract number {0} already exists")]
    DuplicateContractNumber(String),
    #[error("invalid contract status {0}")]
    InvalidStatus(String),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
