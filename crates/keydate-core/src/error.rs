pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid date: {input}")]
    InvalidDate { input: String },

    #[error("Timestamp out of range: {millis}")]
    OutOfRange { millis: f64 },

    #[error("Invalid extractor config: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_date(input: &str) -> Self {
        Self::InvalidDate {
            input: input.to_string(),
        }
    }
}
