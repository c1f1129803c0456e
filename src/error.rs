use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("token lookup collision")]
    TokenLookupCollision,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NameConflict(String),

    #[error("category limit reached")]
    CapacityExceeded,

    #[error("category cannot be deleted because items exist")]
    CategoryNotEmpty,

    #[error("no items registered")]
    ItemsNotRegistered,
}

pub type Result<T> = std::result::Result<T, Error>;
