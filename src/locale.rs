//! Market selection sent with every API request.

// self
use crate::_prelude::*;

/// Site, language, and currency used for pricing and availability.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
	/// Two-letter site code, e.g. `US`.
	pub site: String,
	/// Two-letter language code, e.g. `en`.
	pub language: String,
	/// Three-letter currency code, e.g. `USD`.
	pub currency: String,
}
impl Locale {
	/// Creates a locale from its three parts.
	pub fn new(
		site: impl Into<String>,
		language: impl Into<String>,
		currency: impl Into<String>,
	) -> Self {
		Self { site: site.into(), language: language.into(), currency: currency.into() }
	}

	/// Overrides the site.
	pub fn with_site(mut self, site: impl Into<String>) -> Self {
		self.site = site.into();

		self
	}

	/// Overrides the language.
	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = language.into();

		self
	}

	/// Overrides the currency.
	pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
		self.currency = currency.into();

		self
	}
}
impl Default for Locale {
	fn default() -> Self {
		Self::new("US", "en", "USD")
	}
}
impl Display for Locale {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}/{}/{}", self.site, self.language, self.currency)
	}
}
