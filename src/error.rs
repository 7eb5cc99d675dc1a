#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
