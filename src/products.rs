//! Product search and details operations layered on [`Client::execute`].

pub mod models;
pub mod search;

pub use models::*;
pub use search::*;

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::{
	_prelude::*,
	cache::key,
	client::{ApiRequest, Client},
	context::CallContext,
};

/// Path prefix shared by the product search endpoints.
pub const PRODUCTS_BASE_PATH: &str = "/products/v4/search";
/// Page size used when a search request leaves it unset.
pub const DEFAULT_RECORD_COUNT: i32 = 10;
/// Largest page size the API accepts.
pub const MAX_RECORD_COUNT: i32 = 50;

// Characters left intact in a single path segment.
const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~')
	.remove(b'$')
	.remove(b'&')
	.remove(b'+')
	.remove(b':')
	.remove(b'=')
	.remove(b'@');

impl Client {
	/// Searches products by keyword.
	///
	/// `record_count` is clamped into `1..=50` (unset or negative becomes 10) on a copy; the
	/// caller's request is left untouched. Responses are cached for
	/// [`CacheConfig::search_ttl`](crate::cache::CacheConfig::search_ttl).
	pub async fn keyword_search(
		&self,
		ctx: &CallContext,
		request: &SearchRequest,
	) -> Result<SearchResponse> {
		if request.keywords.is_empty() {
			return Err(Error::InvalidRequest { reason: "keywords are required".into() });
		}

		let mut request = request.clone();

		request.record_count = clamp_record_count(request.record_count);

		let cache_key = key::search_key(&self.locale(), &request)?;
		let api_request = ApiRequest::post(format!("{PRODUCTS_BASE_PATH}/keyword"))
			.json_body(&request)?
			.cached(cache_key, self.cache_config().search_ttl);

		self.execute(ctx, &api_request).await
	}

	/// Fetches the details of one product, serving a cached copy when available.
	pub async fn product_details(
		&self,
		ctx: &CallContext,
		product_number: &str,
	) -> Result<ProductDetailsResponse> {
		let path = details_path(product_number)?;
		let cache_key = key::details_key(&self.locale(), product_number);
		let request = ApiRequest::get(path).cached(cache_key, self.cache_config().details_ttl);

		self.execute(ctx, &request).await
	}

	/// Fetches the details of one product from the API, then refreshes the cached copy.
	///
	/// Useful when current pricing matters more than latency.
	pub async fn product_details_no_cache(
		&self,
		ctx: &CallContext,
		product_number: &str,
	) -> Result<ProductDetailsResponse> {
		let path = details_path(product_number)?;
		let cache_key = key::details_key(&self.locale(), product_number);
		let request =
			ApiRequest::get(path).refresh_cached(cache_key, self.cache_config().details_ttl);

		self.execute(ctx, &request).await
	}
}

fn clamp_record_count(count: i32) -> i32 {
	if count <= 0 { DEFAULT_RECORD_COUNT } else { count.min(MAX_RECORD_COUNT) }
}

fn details_path(product_number: &str) -> Result<String> {
	if product_number.is_empty() {
		return Err(Error::InvalidRequest { reason: "product number is required".into() });
	}

	Ok(format!(
		"{PRODUCTS_BASE_PATH}/{}/productdetails",
		utf8_percent_encode(product_number, PATH_SEGMENT_SET)
	))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_count_is_clamped() {
		assert_eq!(clamp_record_count(-3), 10);
		assert_eq!(clamp_record_count(0), 10);
		assert_eq!(clamp_record_count(1), 1);
		assert_eq!(clamp_record_count(50), 50);
		assert_eq!(clamp_record_count(51), 50);
	}

	#[test]
	fn product_numbers_are_escaped_as_one_segment() {
		assert_eq!(
			details_path("296-1395-5-ND").expect("Plain number should be accepted."),
			"/products/v4/search/296-1395-5-ND/productdetails"
		);
		assert_eq!(
			details_path("ABC/123 X#?").expect("Number with reserved characters should be accepted."),
			"/products/v4/search/ABC%2F123%20X%23%3F/productdetails"
		);
	}

	#[test]
	fn empty_product_number_is_rejected() {
		let err = details_path("").expect_err("Empty number should be rejected.");

		assert!(matches!(err, Error::InvalidRequest { .. }));
		assert_eq!(err.kind(), crate::ErrorKind::InvalidRequest);
	}
}
