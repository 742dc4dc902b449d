//! Maps a [`QueryState`] onto product API request URLs. No IO happens here.
use url::Url;

use crate::QueryState;

/// Fields requested for each product row.
pub const PRODUCT_FIELDS: &str = "id,title,category,price,rating";

/// `GET {base}/products/categories`
pub fn categories_url(base: &Url) -> Url {
    with_segments(base, &["products", "categories"])
}

/// Builds the listing URL for `query`.
///
/// An active search targets the search endpoint and ignores any category;
/// otherwise a selected category scopes the listing.
pub fn build_listing_url(base: &Url, query: &QueryState) -> Url {
    let mut url = if let Some(text) = query.active_search() {
        let mut url = with_segments(base, &["products", "search"]);
        url.query_pairs_mut().append_pair("q", text);
        url
    } else if let Some(slug) = query.category.as_deref() {
        with_segments(base, &["products", "category", slug])
    } else {
        with_segments(base, &["products"])
    };

    url.query_pairs_mut()
        .append_pair("select", PRODUCT_FIELDS)
        .append_pair("limit", &query.page_size.to_string())
        .append_pair("skip", &query.offset().to_string())
        .append_pair("sortBy", query.sort_field.as_str())
        .append_pair("order", query.sort_direction.as_str());
    url
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
