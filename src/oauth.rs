//! Client-credentials exchange against the token endpoint, driven by the `oauth2` crate.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RequestTokenError,
	TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ApiError, AuthError, ConfigError},
	http::{ExchangeHandle, HttpTransport, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

const TOKEN_REQUEST_FAILED: &str = "token request failed";

/// Access token issued by a successful exchange.
#[derive(Clone, Debug)]
pub struct TokenGrant {
	/// Bearer credential.
	pub access_token: TokenSecret,
	/// Lifetime reported by the token endpoint.
	pub expires_in: Duration,
}

/// Performs `grant_type=client_credentials` exchanges, sending the client id and secret in the
/// form body.
pub struct TokenExchange {
	token_url: Url,
	oauth_client: ConfiguredBasicClient,
	transport: Arc<dyn HttpTransport>,
}
impl TokenExchange {
	/// Configures an exchange against `token_url`.
	pub fn new(
		token_url: &Url,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		transport: Arc<dyn HttpTransport>,
	) -> Result<Self> {
		let token_uri = TokenUrl::new(token_url.to_string())
			.map_err(|source| ConfigError::InvalidUrl { endpoint: "token", source })?;
		let oauth_client = BasicClient::new(ClientId::new(client_id.into()))
			.set_client_secret(ClientSecret::new(client_secret.into()))
			.set_token_uri(token_uri)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { token_url: token_url.clone(), oauth_client, transport })
	}

	/// Token endpoint this exchange posts to.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// Requests a fresh access token.
	///
	/// OAuth error bodies map to [`AuthError`]; other non-success responses map to
	/// [`ApiError`] carrying the status and raw body; transport failures pass through.
	pub async fn client_credentials(&self) -> Result<TokenGrant> {
		let meta = ResponseMetadataSlot::default();
		let handle = ExchangeHandle::new(Arc::clone(&self.transport), meta.clone());
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.request_async(&handle)
			.await
			.map_err(|e| map_request_error(meta.take(), e))?;
		let expires_in = response.expires_in().ok_or_else(|| Error::MalformedTokenResponse {
			reason: "expires_in is missing".into(),
		})?;
		let expires_in = i64::try_from(expires_in.as_secs()).map_err(|_| {
			Error::MalformedTokenResponse { reason: "expires_in is out of range".into() }
		})?;

		if expires_in <= 0 {
			return Err(Error::MalformedTokenResponse {
				reason: "expires_in must be positive".into(),
			});
		}

		Ok(TokenGrant {
			access_token: TokenSecret::new(response.access_token().secret().to_owned()),
			expires_in: Duration::seconds(expires_in),
		})
	}
}
impl Debug for TokenExchange {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchange")
			.field("token_url", &self.token_url.as_str())
			.finish_non_exhaustive()
	}
}

fn map_request_error(meta: Option<ResponseMetadata>, err: BasicRequestTokenError<Error>) -> Error {
	let status = meta.as_ref().and_then(|m| m.status);
	let request_id = meta.and_then(|m| m.request_id);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response),
		RequestTokenError::Request(e) => e,
		RequestTokenError::Parse(source, body) => match status {
			Some(status) if status != 200 => ApiError {
				status,
				message: TOKEN_REQUEST_FAILED.into(),
				details: String::from_utf8_lossy(&body).into_owned(),
				request_id,
			}
			.into(),
			status => Error::ResponseParse { source, status: status.unwrap_or(200) },
		},
		RequestTokenError::Other(message) => match status {
			Some(status) if !(200..300).contains(&status) => ApiError {
				status,
				message: TOKEN_REQUEST_FAILED.into(),
				details: message,
				request_id,
			}
			.into(),
			_ => Error::MalformedTokenResponse { reason: message },
		},
	}
}

fn map_server_response_error(response: BasicErrorResponse) -> Error {
	AuthError {
		code: response.error().as_ref().to_owned(),
		description: response.error_description().cloned(),
	}
	.into()
}
