use thiserror::Error;

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// User-facing failures of the catalog client. `message` is meant for display;
/// the transport cause stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{message}")]
    CatalogUnavailable {
        message: String,
        #[source]
        source: TransportError,
    },

    #[error("{message}")]
    DetailUnavailable {
        message: String,
        #[source]
        source: TransportError,
    },
}

impl CatalogError {
    pub fn transport(&self) -> &TransportError {
        match self {
            CatalogError::CatalogUnavailable { source, .. }
            | CatalogError::DetailUnavailable { source, .. } => source,
        }
    }
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("alert platform rejected the alert: {0}")]
    Rejected(String),

    #[error("unknown alert handle {0}")]
    UnknownHandle(u64),
}
