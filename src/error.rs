use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Market data provider error: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;
