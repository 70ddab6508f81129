use thiserror::Error;

/// Failure modes of the core operations. Everything here propagates to the
/// caller; catalog-lookup misses in the achievement engine are the one
/// deliberate exception and are logged instead (see gamification::engine).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    #[error("not enough resilient coins")]
    InsufficientFunds,

    #[error("user is already premium")]
    AlreadyPremium,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
