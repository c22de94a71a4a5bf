use relay_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("persistence: {0}")]
    Persistence(String),

    #[error("aggregate not found: {0}")]
    AggregateNotFound(String),
}
