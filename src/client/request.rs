//! Description of one pipeline call.

// crates.io
use oauth2::http::Method;
// self
use crate::_prelude::*;

/// Caching instructions attached to an [`ApiRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheDirective {
	/// Key the response is stored under.
	pub key: String,
	/// Lifetime of the stored response.
	pub ttl: StdDuration,
	/// When `false` the cache is not consulted, but a fresh response still replaces the entry.
	pub lookup: bool,
}

/// Method, path, body, and cache directive of a request issued through
/// [`Client::execute`](crate::client::Client::execute).
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the client's base URL, starting with `/`.
	pub path: String,
	/// Pre-encoded JSON body.
	pub body: Option<Vec<u8>>,
	/// Optional caching instructions.
	pub cache: Option<CacheDirective>,
}
impl ApiRequest {
	/// Creates a request without body or cache directive.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), body: None, cache: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Encodes `body` as the JSON request payload.
	pub fn json_body<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(body).map_err(Error::RequestEncode)?);

		Ok(self)
	}

	/// Serves the response from the cache when possible and stores fresh responses.
	pub fn cached(mut self, key: impl Into<String>, ttl: StdDuration) -> Self {
		self.cache = Some(CacheDirective { key: key.into(), ttl, lookup: true });

		self
	}

	/// Skips the cache lookup but stores the fresh response under `key`.
	pub fn refresh_cached(mut self, key: impl Into<String>, ttl: StdDuration) -> Self {
		self.cache = Some(CacheDirective { key: key.into(), ttl, lookup: false });

		self
	}
}
