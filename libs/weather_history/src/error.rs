use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryDecodeError {
    #[error("History token is not a JSON list of strings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("History token is not valid UTF-8 once percent-decoded: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
