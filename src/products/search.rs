//! Fluent construction of keyword search requests.

// self
use crate::{
	_prelude::*,
	client::Client,
	context::CallContext,
	products::{
		DEFAULT_RECORD_COUNT, FilterRequest, Filters, MAX_RECORD_COUNT, ParametricFilter,
		SearchRequest, SearchResponse, SortOptions,
	},
};

/// Builder for [`SearchRequest`] values.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
	request: SearchRequest,
}
impl SearchQuery {
	/// Starts a query for `keywords` returning 10 records.
	pub fn new(keywords: impl Into<String>) -> Self {
		let request = SearchRequest::new(keywords);

		Self { request: SearchRequest { record_count: DEFAULT_RECORD_COUNT, ..request } }
	}

	/// Sets the page size, clamped into `1..=50`.
	pub fn limit(mut self, count: i32) -> Self {
		self.request.record_count = count.clamp(1, MAX_RECORD_COUNT);

		self
	}

	/// Sets the offset of the first record; negative values count as zero.
	pub fn offset(mut self, position: i32) -> Self {
		self.request.record_start_position = position.max(0);

		self
	}

	/// Sets the quantity used for price calculations.
	pub fn quantity(mut self, quantity: i32) -> Self {
		self.request.requested_quantity = quantity;

		self
	}

	/// Restricts results to the given categories.
	pub fn filter_by_category(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
		self.filters().category_ids.extend(ids);

		self
	}

	/// Restricts results to the given manufacturers.
	pub fn filter_by_manufacturer(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
		self.filters().manufacturer_ids.extend(ids);

		self
	}

	/// Restricts results to the given product statuses.
	pub fn filter_by_status(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
		self.filters().status_ids.extend(ids);

		self
	}

	/// Restricts results to the given package types.
	pub fn filter_by_package_type(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
		self.filters().package_type_ids.extend(ids);

		self
	}

	/// Adds a filter accepting any of `value_ids` for `parameter_id`.
	pub fn parametric_filter<I, S>(mut self, parameter_id: i32, value_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.filters().parametric_filters.push(ParametricFilter {
			parameter_id,
			value_ids: value_ids.into_iter().map(Into::into).collect(),
			..Default::default()
		});

		self
	}

	/// Sorts results by `field` in `direction` (`Ascending` or `Descending`).
	pub fn sort_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
		self.request.sort = Some(SortOptions { field: field.into(), direction: direction.into() });

		self
	}

	/// Adds search options such as `InStock`.
	pub fn search_options<I, S>(mut self, options: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.request.search_options.extend(options.into_iter().map(Into::into));

		self
	}

	/// Requests filter facets alongside the results.
	pub fn filter_options(mut self, options: FilterRequest) -> Self {
		self.request.filter_options_request = Some(options);

		self
	}

	/// Returns the assembled request.
	pub fn build(self) -> SearchRequest {
		self.request
	}

	/// Runs the search with `client`.
	pub async fn execute(&self, ctx: &CallContext, client: &Client) -> Result<SearchResponse> {
		client.keyword_search(ctx, &self.request).await
	}

	fn filters(&mut self) -> &mut Filters {
		self.request.filters.get_or_insert_with(Filters::default)
	}
}
