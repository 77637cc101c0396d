//! Check stock of products on the Ubiquiti store.
//!
//! `ProductAvailability` can resolve whether a product is in
//! stock from its page URL, or from page HTML that is already
//! at hand.
//!
//! Feature Flags:
//! - `serde`: Enables serde support for the structs. (default)

mod availability;
mod error;

pub use availability::ProductAvailability;
pub use error::StockError;
use header::{HeaderMap, HeaderValue};
use reqwest::header;
pub use url::Url;

/// Builds the default headers for the client.
fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static("Mozilla/5.0 (stock-check-script)"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers
}
