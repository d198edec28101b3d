#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of a [`PriceError`], used to pick the message shown
/// to the user after a failed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Network,
    Storage,
    Other,
}

impl PriceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PriceError::NotFound(_) => ErrorKind::NotFound,
            PriceError::Network(_) => ErrorKind::Network,
            PriceError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                ErrorKind::Network
            }
            PriceError::Http(e) if e.is_status() || e.is_decode() => ErrorKind::NotFound,
            PriceError::Storage(_) | PriceError::Io(_) => ErrorKind::Storage,
            _ => ErrorKind::Other,
        }
    }

    /// The single message surfaced to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "No price data found, please check the item name",
            ErrorKind::Network => "Network error, please try again later",
            ErrorKind::Storage => "Local storage is unavailable",
            ErrorKind::Other => "Failed to load price data",
        }
    }
}

pub type Result<T> = std::result::Result<T, PriceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_variants_map_to_kinds() {
        assert_eq!(PriceError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(PriceError::Network("x".into()).kind(), ErrorKind::Network);
        assert_eq!(PriceError::Storage("x".into()).kind(), ErrorKind::Storage);
        assert_eq!(
            PriceError::InvalidArgument("x".into()).kind(),
            ErrorKind::Other
        );
    }

    #[test]
    fn not_found_message_mentions_item_name() {
        let msg = PriceError::NotFound("PLEX".into()).user_message();
        assert!(msg.contains("item name"));
    }
}
