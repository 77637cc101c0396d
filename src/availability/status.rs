use chrono::NaiveDate;

pub(crate) const STATUS_AVAILABLE: &str = "Available";
pub(crate) const STATUS_COMING_SOON: &str = "ComingSoon";
pub(crate) const STATUS_UNKNOWN: &str = "Unknown";

/// Resolves the status shown to the user: the product-level status
/// wins, then the first variant's, then `"Unknown"`.
pub(crate) fn effective_status(product_status: &str, variant_status: &str) -> String {
    if !product_status.is_empty() {
        product_status.to_string()
    } else if !variant_status.is_empty() {
        variant_status.to_string()
    } else {
        STATUS_UNKNOWN.to_string()
    }
}

/// Scans product tags for a date-encoded marker.
///
/// Tags are `:`-separated, e.g. `available:x:y:date:2024-03-01`; the
/// segment after a `date` segment is the expected availability date.
/// Malformed date segments are treated as absent.
pub(crate) fn date_from_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Option<NaiveDate> {
    for tag in tags {
        let mut segments = tag.split(':');
        while let Some(segment) = segments.next() {
            if segment != "date" {
                continue;
            }
            let parsed = segments
                .next()
                .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
            if parsed.is_some() {
                return parsed;
            }
        }
    }
    None
}
