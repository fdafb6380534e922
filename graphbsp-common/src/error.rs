use thiserror::Error;

pub type BspResult<T> = Result<T, BspError>;

#[derive(Debug, Error)]
pub enum BspError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("routing error: {0}")]
    Routing(String),

    #[error("liveness failure: {0}")]
    Liveness(String),

    #[error("state error: {0}")]
    State(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
