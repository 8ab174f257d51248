use hyper::HeaderMap;
use hyper::header::HeaderValue;

/// Builds the `Content-Range` header for one page of a list.
///
/// # Arguments
///
/// * `offset` - Zero-based index of the first item on the page.
/// * `limit` - Page size.
/// * `total_count` - Number of items matching the filter.
/// * `resource_name` - The name of the resource being paginated.
///
/// The header reads `"{resource_name} {first}-{last}/{total_count}"`. An
/// empty map is returned when the value is not a valid header (e.g. the
/// resource name contains control characters).
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let last = offset
        .saturating_add(limit)
        .saturating_sub(1)
        .min(total_count.saturating_sub(1))
        .max(offset);

    let content_range = format!("{resource_name} {offset}-{last}/{total_count}");

    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&content_range) {
        Ok(value) => {
            headers.insert("Content-Range", value);
        }
        Err(err) => {
            tracing::debug!(%content_range, error = %err, "skipping invalid Content-Range header");
        }
    }
    headers
}
