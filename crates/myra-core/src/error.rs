use thiserror::Error;

#[derive(Debug, Error)]
pub enum MyraError {
    #[error("agreement not found: {0}")]
    AgreementNotFound(String),

    #[error("zone not found: {0}")]
    ZoneNotFound(i32),

    #[error("agreement status not found: {0}")]
    AgreementStatusNotFound(i32),

    #[error("livestock identifier not found: {0}")]
    LivestockIdentifierNotFound(i32),

    #[error("no updatable fields in request body")]
    NoUpdatableFields,

    #[error("invalid value for field: {0}")]
    InvalidFieldValue(String),

    #[error("column not allowed in filter: {0}")]
    InvalidFilterColumn(String),

    #[error("unknown reference table: {0}")]
    UnknownReferenceTable(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, MyraError>;
