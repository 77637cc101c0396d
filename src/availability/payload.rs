use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::StockError;

/// Key path from the payload root down to the products list.
const PRODUCTS_PATH: [&str; 4] = ["props", "pageProps", "collection", "products"];

/// Extracts the page payload embedded in the product page HTML.
///
/// The store is server-rendered; the hydration state lives in a
/// `<script id="__NEXT_DATA__" type="application/json">` tag whose
/// content (possibly spanning many lines) is a JSON document.
pub(crate) fn embedded_payload(html: &str) -> Result<Value, StockError> {
    let payload_selector = &Selector::parse("script#__NEXT_DATA__").unwrap();

    let document = Html::parse_document(html);
    let raw = document
        .select(payload_selector)
        .next()
        .map(|tag| tag.text().collect::<String>())
        .ok_or(StockError::MissingPayload)?;

    tracing::debug!(bytes = raw.len(), "found embedded page payload");
    Ok(serde_json::from_str(&raw)?)
}

/// Walks the fixed key path down to the products list.
///
/// A missing key reports the deepest path reached.
pub(crate) fn products(payload: &Value) -> Result<&Vec<Value>, StockError> {
    let mut node = payload;
    for (depth, key) in PRODUCTS_PATH.iter().enumerate() {
        node = node.get(key).ok_or_else(|| StockError::MissingKey {
            path: PRODUCTS_PATH[..=depth].join("."),
        })?;
    }
    node.as_array().ok_or_else(|| StockError::MissingKey {
        path: PRODUCTS_PATH.join("."),
    })
}
