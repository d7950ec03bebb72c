//! Deterministic cache keys derived from the locale and the operation parameters.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, locale::Locale};

// Keeps each locale field free of the `:` separator.
const FIELD_SET: &AsciiSet = &CONTROLS.add(b':').add(b'%');

/// Key for a product details lookup.
pub fn details_key(locale: &Locale, product_number: &str) -> String {
	format!("details:{}:{product_number}", locale_segment(locale))
}

/// Key for a search request, fingerprinting its JSON encoding.
///
/// Two requests map to the same key exactly when they serialize identically under the same
/// locale.
pub fn search_key<T>(locale: &Locale, request: &T) -> Result<String>
where
	T: ?Sized + Serialize,
{
	let encoded = serde_json::to_vec(request).map_err(Error::RequestEncode)?;

	Ok(format!("search:{}:{}", locale_segment(locale), compute_fingerprint(&encoded)))
}

fn locale_segment(locale: &Locale) -> String {
	format!(
		"{}:{}:{}",
		utf8_percent_encode(&locale.site, FIELD_SET),
		utf8_percent_encode(&locale.language, FIELD_SET),
		utf8_percent_encode(&locale.currency, FIELD_SET),
	)
}

fn compute_fingerprint(bytes: &[u8]) -> String {
	let mut hasher = Sha256::new();

	hasher.update(bytes);

	let digest = hasher.finalize();

	STANDARD_NO_PAD.encode(digest)
}
