use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown catalog table: {0}")]
    UnknownTable(String),

    #[error("Invalid definition hash: {0}")]
    InvalidHash(String),

    #[error("Catalog request failed with HTTP {status}: {message}")]
    CatalogStatus { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Timeouts, connection failures and 5xx responses are transient;
    /// 4xx responses and decode failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout(_) | Error::NetworkError(_) => true,
            Error::CatalogStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => Error::CatalogStatus {
                status,
                message: format!("HTTP {} error", status),
            },
            ureq::Error::Timeout(kind) => Error::Timeout(format!("{:?}", kind)),
            ureq::Error::Io(io) => Error::NetworkError(format!("Connection failed: {}", io)),
            ureq::Error::Json(json) => Error::Json(json),
            other => Error::NetworkError(format!("HTTP error: {}", other)),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParseError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(Error::Timeout("global".to_string()).is_transient());
        assert!(Error::NetworkError("reset".to_string()).is_transient());
        assert!(
            Error::CatalogStatus {
                status: 503,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            !Error::CatalogStatus {
                status: 404,
                message: String::new()
            }
            .is_transient()
        );
        assert!(!Error::Cancelled.is_transient());
    }
}
