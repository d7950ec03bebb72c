//! Digi-Key access token held by the credential manager.

// crates.io
use oauth2::http::HeaderValue;
// self
use crate::_prelude::*;

/// Access token issued by the Digi-Key token endpoint.
///
/// Cloning is cheap so every in-flight request can hold the token it was signed with while the
/// manager swaps in a refreshed one. Formatting never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(Arc<str>);
impl TokenSecret {
	/// Wraps a raw access token.
	pub fn new(value: impl Into<Arc<str>>) -> Self {
		Self(value.into())
	}

	/// Raw token. Keep it out of logs.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Builds the `Authorization: Bearer ...` value sent on every API call.
	///
	/// The value is marked sensitive so `http`'s own formatting hides it. A token containing
	/// bytes that cannot travel in a header is reported as a malformed token response.
	pub fn header_value(&self) -> Result<HeaderValue> {
		let mut value = HeaderValue::try_from(format!("Bearer {}", self.0)).map_err(|_| {
			Error::MalformedTokenResponse {
				reason: "access token is not a valid header value".into(),
			}
		})?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSecret(<redacted>)")
	}
}
