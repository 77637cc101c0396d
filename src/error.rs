use thiserror::Error;

/// Errors produced while checking a product page.
#[derive(Debug, Error)]
pub enum StockError {
    /// Network-level failure: connect error, timeout, or body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The page HTML carries no embedded payload script tag.
    #[error("could not locate the embedded page payload")]
    MissingPayload,

    /// The payload script tag exists but its content is not valid JSON.
    #[error("embedded page payload is not valid JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The payload parsed, but the fixed key path to the products
    /// list is broken.
    #[error("page payload is missing expected key: {path}")]
    MissingKey { path: String },

    /// The payload parsed, but its products list is empty.
    #[error("page payload lists no products")]
    NoProducts,
}
