//! Transport primitives shared by API calls and token exchanges.
//!
//! [`HttpTransport`] is the crate's only dependency on an HTTP stack. The default
//! [`ReqwestTransport`] (feature `reqwest`) wraps a [`ReqwestClient`]; tests and embedders can
//! supply their own implementation through
//! [`ClientBuilder::transport`](crate::client::ClientBuilder::transport).
//!
//! Token exchanges go through the `oauth2` crate, which drives the transport via
//! [`ExchangeHandle`]. The handle records the status and request id of every response in a
//! [`ResponseMetadataSlot`] so the exchange layer can classify failures that `oauth2` reports
//! without that context.

// crates.io
use oauth2::{AsyncHttpClient, HttpRequest, HttpResponse};
// self
use crate::{_prelude::*, error::TransportError};

/// Response header carrying the upstream request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse>> + 'a + Send>>;

/// Executes fully-buffered HTTP exchanges.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// request the client issues. Network failures should surface as [`Error::Transport`] so the
/// retry policy can classify them; any HTTP status, successful or not, is a successful send.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the whole response body.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Metadata captured from the most recent token endpoint response.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code, if a response arrived.
	pub status: Option<u16>,
	/// Value of the `X-Request-Id` header, if present.
	pub request_id: Option<String>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// [`AsyncHttpClient`] adapter that routes `oauth2` requests through an [`HttpTransport`].
#[derive(Clone)]
pub struct ExchangeHandle {
	transport: Arc<dyn HttpTransport>,
	slot: ResponseMetadataSlot,
}
impl ExchangeHandle {
	/// Wraps `transport`, publishing response metadata into `slot`.
	pub fn new(transport: Arc<dyn HttpTransport>, slot: ResponseMetadataSlot) -> Self {
		Self { transport, slot }
	}
}
impl Debug for ExchangeHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExchangeHandle").field("slot", &self.slot).finish_non_exhaustive()
	}
}
impl<'c> AsyncHttpClient<'c> for ExchangeHandle {
	type Error = Error;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.slot.take();

			let response = self.transport.send(request).await?;

			self.slot.store(ResponseMetadata {
				status: Some(response.status().as_u16()),
				request_id: header_value(response.headers(), REQUEST_ID_HEADER),
			});

			Ok(response)
		})
	}
}

/// Reads a header as an owned string, skipping values that are not visible ASCII.
pub fn header_value(headers: &http::HeaderMap, name: &str) -> Option<String> {
	headers.get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
}

/// Default transport backed by [`ReqwestClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests fail with a timeout error after `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let request: reqwest::Request = request.try_into().map_err(TransportError::from)?;
			let response = self.0.execute(request).await.map_err(TransportError::from)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(TransportError::from)?;
			let mut converted = HttpResponse::new(body.to_vec());

			*converted.status_mut() = status;
			*converted.headers_mut() = headers;

			Ok(converted)
		})
	}
}
