use thiserror::Error;

use crate::color::ColorParseError;

#[derive(Debug, Error)]
pub enum EmojiError {
    #[error("API error: {status} {status_text}")]
    Fetch { status: u16, status_text: String },
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Color parse error: {0}")]
    Parse(#[from] ColorParseError),
    #[error("Request error: {0}")]
    Request(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Unknown(String),
}

impl EmojiError {
    pub fn fetch(status: reqwest::StatusCode) -> Self {
        EmojiError::Fetch {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EmojiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_message_carries_status() {
        let err = EmojiError::fetch(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "API error: 500 Internal Server Error");
    }

    #[test]
    fn parse_error_converts() {
        let err: EmojiError = ColorParseError::InvalidLength(5).into();
        assert!(matches!(err, EmojiError::Parse(_)));
    }
}
