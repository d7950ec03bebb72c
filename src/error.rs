//! Client-level error types shared across the request pipeline, credentials, and quota layers.

// self
use crate::{_prelude::*, rate_limit::RateWindowKind};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Remote API answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Token endpoint rejected the client credentials.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Local quota accounting refused the request.
	#[error(transparent)]
	RateLimited(#[from] RateLimitError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Caller-supplied parameters failed local validation.
	#[error("Invalid request: {reason}.")]
	InvalidRequest {
		/// Human-readable validation failure.
		reason: String,
	},
	/// Response payload could not be decoded into the requested shape.
	#[error("Response body (status {status}) could not be decoded.")]
	ResponseParse {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status of the response that carried the payload.
		status: u16,
	},
	/// Token endpoint answered successfully but the grant is unusable.
	#[error("Token endpoint returned a malformed grant: {reason}.")]
	MalformedTokenResponse {
		/// Description of what was wrong with the grant.
		reason: String,
	},
	/// Request body could not be encoded as JSON.
	#[error("Request body could not be encoded.")]
	RequestEncode(#[source] serde_json::Error),
	/// Caller cancelled the operation.
	#[error("Operation was cancelled.")]
	Cancelled,
	/// Caller deadline elapsed before the operation completed.
	#[error("Operation deadline exceeded.")]
	DeadlineExceeded,
}
impl Error {
	/// Returns the generic category of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Api(e) => e.kind(),
			Self::Auth(_) => ErrorKind::Unauthorized,
			Self::RateLimited(_) => ErrorKind::RateLimitExceeded,
			Self::Transport(_) => ErrorKind::Transport,
			Self::Config(_) => ErrorKind::Config,
			Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
			Self::ResponseParse { .. } | Self::MalformedTokenResponse { .. } | Self::RequestEncode(_) =>
				ErrorKind::Parse,
			Self::Cancelled | Self::DeadlineExceeded => ErrorKind::Cancelled,
		}
	}

	/// HTTP status associated with the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api(e) => Some(e.status),
			Self::ResponseParse { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns `true` for local quota refusals and upstream 429 responses alike.
	pub fn is_rate_limited(&self) -> bool {
		matches!(self.kind(), ErrorKind::RateLimitExceeded)
	}

	/// Returns `true` for rejected credentials and upstream 401 responses alike.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self.kind(), ErrorKind::Unauthorized)
	}

	/// Returns `true` when the caller cancelled or the deadline elapsed.
	pub fn is_cancelled(&self) -> bool {
		matches!(self.kind(), ErrorKind::Cancelled)
	}
}

/// Generic error categories callers can branch on without string matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Credentials are missing, invalid, or expired (HTTP 401, OAuth errors).
	Unauthorized,
	/// Caller is not allowed to access the resource (HTTP 403).
	Forbidden,
	/// Resource does not exist (HTTP 404).
	NotFound,
	/// Quota exhausted locally or signalled upstream (HTTP 429).
	RateLimitExceeded,
	/// Request was rejected as malformed (HTTP 400, local validation).
	InvalidRequest,
	/// Upstream failure (HTTP 5xx).
	ServerError,
	/// Any other non-success HTTP status.
	Api,
	/// Network or I/O failure.
	Transport,
	/// Cancellation or deadline.
	Cancelled,
	/// Payload could not be encoded or decoded.
	Parse,
	/// Local configuration problem.
	Config,
}
impl ErrorKind {
	/// Maps an HTTP status code onto its category.
	pub const fn from_status(status: u16) -> Self {
		match status {
			400 => Self::InvalidRequest,
			401 => Self::Unauthorized,
			403 => Self::Forbidden,
			404 => Self::NotFound,
			429 => Self::RateLimitExceeded,
			500.. => Self::ServerError,
			_ => Self::Api,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Unauthorized => "unauthorized",
			Self::Forbidden => "forbidden",
			Self::NotFound => "not_found",
			Self::RateLimitExceeded => "rate_limit_exceeded",
			Self::InvalidRequest => "invalid_request",
			Self::ServerError => "server_error",
			Self::Api => "api",
			Self::Transport => "transport",
			Self::Cancelled => "cancelled",
			Self::Parse => "parse",
			Self::Config => "config",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Non-success response returned by the remote API.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Message from the error body, or the canonical status text.
	pub message: String,
	/// Details from the error body, or the raw body.
	pub details: String,
	/// Value of the `X-Request-Id` response header, if present.
	pub request_id: Option<String>,
}
impl ApiError {
	/// Returns the category derived from the status code.
	pub fn kind(&self) -> ErrorKind {
		ErrorKind::from_status(self.status)
	}
}
impl Display for ApiError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		if self.details.is_empty() {
			write!(f, "API error: {} (status {}).", self.message, self.status)
		} else {
			write!(f, "API error: {} (status {}): {}.", self.message, self.status, self.details)
		}
	}
}

/// OAuth error body (`{error, error_description}`) returned by the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub struct AuthError {
	/// OAuth `error` code.
	pub code: String,
	/// OAuth `error_description`, when supplied.
	pub description: Option<String>,
}
impl Display for AuthError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.description {
			Some(description) =>
				write!(f, "Authentication failed: {}: {description}.", self.code),
			None => write!(f, "Authentication failed: {}.", self.code),
		}
	}
}

/// Local quota refusal raised before a request leaves the process.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error(
	"Rate limit exceeded ({window} limit: {limit}, remaining: {remaining}, resets at: {reset_at})."
)]
pub struct RateLimitError {
	/// Configured limit of the exhausted window.
	pub limit: u32,
	/// Requests remaining in the exhausted window.
	pub remaining: u32,
	/// Instant the exhausted window resets.
	pub reset_at: OffsetDateTime,
	/// Which window was exhausted.
	pub window: RateWindowKind,
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured endpoint is not a valid URL.
	#[error("The {endpoint} URL is invalid.")]
	InvalidUrl {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// No transport was configured and the default one is compiled out.
	#[error("No HTTP transport is configured.")]
	MissingTransport,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Request did not complete within the transport timeout.
	#[error("Request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Connection could not be established; the condition may be temporary.
	#[error("Connection to the remote host failed.")]
	Connect {
		/// Transport-specific connection error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a non-transient network failure.
	#[error("Network error occurred while calling the remote API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Wraps a transport-specific connection error.
	pub fn connect(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Connect { source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns `true` if the failure was a timeout.
	pub fn is_timeout(&self) -> bool {
		match self {
			Self::Timeout { .. } => true,
			Self::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
			_ => false,
		}
	}

	/// Returns `true` if the failure is a timeout or otherwise expected to clear on its own.
	pub fn is_temporary(&self) -> bool {
		use std::io::ErrorKind as IoKind;

		match self {
			Self::Timeout { .. } | Self::Connect { .. } => true,
			Self::Network { .. } => false,
			Self::Io(e) => matches!(
				e.kind(),
				IoKind::TimedOut
					| IoKind::Interrupted
					| IoKind::WouldBlock
					| IoKind::ConnectionReset
					| IoKind::ConnectionAborted
			),
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::timeout(e)
		} else if e.is_connect() {
			Self::connect(e)
		} else {
			Self::network(e)
		}
	}
}
