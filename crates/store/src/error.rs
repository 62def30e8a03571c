use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Record for {0:?} is not a JSON object")]
    NotAnObject(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
