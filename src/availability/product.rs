use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::availability::payload;
use crate::availability::status::{self, STATUS_AVAILABLE, STATUS_COMING_SOON};
use crate::error::StockError;

/// Seconds before an in-flight page request is abandoned.
const REQUEST_TIMEOUT_SECS: u64 = 20;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
/// The stock state of a store product.
///
/// Use the `ProductAvailability::fetch` method to check a product
/// from its page url, or `ProductAvailability::from_html` when the
/// page HTML is already at hand.
pub struct ProductAvailability {
    /// Product name, when the page payload carries one.
    pub name: Option<String>,
    /// Resolved status string: product-level, falling back to the
    /// first variant's, then `"Unknown"`.
    pub status: String,
    /// Whether the product is in stock.
    pub in_stock: bool,
    /// Expected availability date, when a product tag encodes one.
    pub expected_date: Option<NaiveDate>,
}

impl ProductAvailability {
    /// Checks the product on the given page url.
    ///
    /// ```rust,no_run
    /// use std::error::Error;
    /// use uistore_scraper::{ProductAvailability, Url};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn Error>> {
    ///     let url = "https://uk.store.ui.com/uk/en/category/wifi-special-devices/products/utr";
    ///     let availability = ProductAvailability::fetch(Url::parse(url)?).await;
    ///     println!("{:#?}", availability);
    ///     Ok(())
    /// }
    /// ```
    pub async fn fetch(url: Url) -> Result<Self, StockError> {
        let body = fetch_page(url).await?;
        Self::from_html(&body)
    }

    /// Checks every product listed on the given page url.
    pub async fn fetch_all(url: Url) -> Result<Vec<Self>, StockError> {
        let body = fetch_page(url).await?;
        Self::all_from_html(&body)
    }

    /// Resolves the first product in the page's embedded payload.
    ///
    /// Pure function of the input text; each call produces a fresh,
    /// independent result.
    pub fn from_html(html: &str) -> Result<Self, StockError> {
        let payload = payload::embedded_payload(html)?;
        let products = payload::products(&payload)?;
        let first = products.first().ok_or(StockError::NoProducts)?;
        Ok(Self::from_record(first))
    }

    /// Resolves every product in the page's embedded payload.
    pub fn all_from_html(html: &str) -> Result<Vec<Self>, StockError> {
        let payload = payload::embedded_payload(html)?;
        let products = payload::products(&payload)?;
        if products.is_empty() {
            return Err(StockError::NoProducts);
        }
        Ok(products.iter().map(Self::from_record).collect())
    }

    /// Whether the product is announced but not yet on sale.
    pub fn is_coming_soon(&self) -> bool {
        self.status == STATUS_COMING_SOON
    }

    fn from_record(record: &Value) -> Self {
        let name = record
            .get("name")
            .or_else(|| record.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let product_status = record.get("status").and_then(Value::as_str).unwrap_or("");
        let variant_status = record
            .get("variants")
            .and_then(Value::as_array)
            .and_then(|variants| variants.first())
            .and_then(|variant| variant.get("status"))
            .and_then(Value::as_str)
            .unwrap_or("");

        let expected_date = record
            .get("tags")
            .and_then(Value::as_array)
            .and_then(|tags| status::date_from_tags(tags.iter().filter_map(Value::as_str)));

        ProductAvailability {
            name,
            status: status::effective_status(product_status, variant_status),
            in_stock: product_status == STATUS_AVAILABLE || variant_status == STATUS_AVAILABLE,
            expected_date,
        }
    }
}

/// One GET with the crate's fixed headers and timeout. No retries at
/// the transport layer; in watch mode the next poll is the retry.
async fn fetch_page(url: Url) -> Result<String, StockError> {
    let client = Client::builder()
        .default_headers(crate::build_headers())
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;

    tracing::debug!(%url, "requesting product page");
    let response = client.get(url.to_owned()).send().await?;
    let http_status = response.status();
    if !http_status.is_success() {
        return Err(StockError::UnexpectedStatus {
            status: http_status.as_u16(),
            url: url.into(),
        });
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(products: &str) -> String {
        format!(
            "<html><body><script id=\"__NEXT_DATA__\" type=\"application/json\">\
             {{\"props\": {{\"pageProps\": {{\"collection\": {{\"products\": {products}}}}}}}}}\
             </script></body></html>"
        )
    }

    #[test]
    fn product_status_available_regardless_of_variants() {
        let html = page(
            r#"[{"name": "UTR", "status": "Available", "variants": [{"status": "SoldOut"}]}]"#,
        );
        let availability = ProductAvailability::from_html(&html).unwrap();
        assert_eq!(availability.status, "Available");
        assert!(availability.in_stock);
        assert_eq!(availability.name.as_deref(), Some("UTR"));
    }

    #[test]
    fn variant_status_used_when_product_status_empty() {
        let html = page(r#"[{"status": "", "variants": [{"status": "Available"}]}]"#);
        let availability = ProductAvailability::from_html(&html).unwrap();
        assert_eq!(availability.status, "Available");
        assert!(availability.in_stock);
    }

    #[test]
    fn no_status_anywhere_is_unknown_and_out_of_stock() {
        let html = page(r#"[{"variants": []}]"#);
        let availability = ProductAvailability::from_html(&html).unwrap();
        assert_eq!(availability.status, "Unknown");
        assert!(!availability.in_stock);
    }

    #[test]
    fn coming_soon_is_not_in_stock() {
        let html = page(r#"[{"status": "ComingSoon", "variants": []}]"#);
        let availability = ProductAvailability::from_html(&html).unwrap();
        assert!(availability.is_coming_soon());
        assert!(!availability.in_stock);
    }

    #[test]
    fn date_tag_surfaces_expected_date() {
        let html = page(
            r#"[{"status": "ComingSoon", "variants": [], "tags": ["available:x:y:date:2024-03-01"]}]"#,
        );
        let availability = ProductAvailability::from_html(&html).unwrap();
        assert_eq!(
            availability.expected_date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn malformed_date_tag_is_absent_not_an_error() {
        let html = page(r#"[{"status": "ComingSoon", "variants": [], "tags": ["date:03-2024"]}]"#);
        let availability = ProductAvailability::from_html(&html).unwrap();
        assert_eq!(availability.expected_date, None);
    }

    #[test]
    fn empty_products_list_is_no_products() {
        let html = page("[]");
        assert!(matches!(
            ProductAvailability::from_html(&html),
            Err(StockError::NoProducts)
        ));
    }

    #[test]
    fn all_from_html_maps_every_product() {
        let html = page(
            r#"[{"name": "UTR", "status": "Available", "variants": []},
                {"name": "UDR", "status": "SoldOut", "variants": []}]"#,
        );
        let all = ProductAvailability::all_from_html(&html).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].in_stock);
        assert!(!all[1].in_stock);
    }
}
