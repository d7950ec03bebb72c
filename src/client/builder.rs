//! Configuration surface for [`Client`].

// self
use crate::{
	_prelude::*,
	auth::{CredentialManager, DEFAULT_REFRESH_BUFFER},
	cache::{CacheConfig, MemoryCache, ResponseCache},
	client::Client,
	error::ConfigError,
	http::HttpTransport,
	locale::Locale,
	oauth::TokenExchange,
	rate_limit::RateLimiter,
	retry::RetryConfig,
};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.digikey.com";
/// Default OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.digikey.com/v1/oauth2/token";
/// Default timeout applied by the built-in transport.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Builder for [`Client`] values.
pub struct ClientBuilder {
	/// OAuth client identifier, also sent as the client id header.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: String,
	/// API base URL.
	pub base_url: String,
	/// Token endpoint URL.
	pub token_url: String,
	/// Custom transport; the reqwest transport is built when absent.
	pub transport: Option<Arc<dyn HttpTransport>>,
	/// Timeout for the built-in transport.
	pub timeout: StdDuration,
	/// Initial locale.
	pub locale: Locale,
	/// Quota limiter; defaults to 120/minute and 1000/day.
	pub rate_limiter: Option<RateLimiter>,
	/// Retry policy.
	pub retry: RetryConfig,
	/// Custom response cache; an in-memory cache is created when caching is enabled.
	pub cache: Option<Arc<dyn ResponseCache>>,
	/// Cache behavior.
	pub cache_config: CacheConfig,
	/// Margin before expiry at which the access token is refreshed.
	pub refresh_buffer: Duration,
}
impl ClientBuilder {
	/// Creates a builder seeded with the defaults.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			base_url: DEFAULT_BASE_URL.into(),
			token_url: DEFAULT_TOKEN_URL.into(),
			transport: None,
			timeout: DEFAULT_TIMEOUT,
			locale: Locale::default(),
			rate_limiter: None,
			retry: RetryConfig::default(),
			cache: None,
			cache_config: CacheConfig::default(),
			refresh_buffer: DEFAULT_REFRESH_BUFFER,
		}
	}

	/// Sets the API base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Sets the token endpoint URL.
	pub fn token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = url.into();

		self
	}

	/// Uses a custom transport for both API calls and token exchanges.
	pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
		self.transport = Some(transport);

		self
	}

	/// Sets the timeout of the built-in transport. Ignored when a custom transport is supplied.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Sets the initial locale.
	pub fn locale(mut self, locale: Locale) -> Self {
		self.locale = locale;

		self
	}

	/// Uses custom per-minute and per-day quotas.
	pub fn rate_limits(mut self, per_minute: u32, per_day: u32) -> Self {
		self.rate_limiter = Some(RateLimiter::with_limits(per_minute, per_day));

		self
	}

	/// Uses a preconfigured limiter.
	pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
		self.rate_limiter = Some(limiter);

		self
	}

	/// Sets the retry policy.
	pub fn retry_config(mut self, config: RetryConfig) -> Self {
		self.retry = config;

		self
	}

	/// Performs a single attempt per request.
	pub fn without_retry(mut self) -> Self {
		self.retry = RetryConfig::disabled();

		self
	}

	/// Uses a custom response cache.
	pub fn cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
		self.cache = Some(cache);

		self
	}

	/// Sets the cache behavior.
	pub fn cache_config(mut self, config: CacheConfig) -> Self {
		self.cache_config = config;

		self
	}

	/// Disables response caching.
	pub fn without_cache(mut self) -> Self {
		self.cache_config.enabled = false;

		self
	}

	/// Sets how long before expiry the access token is refreshed.
	pub fn refresh_buffer(mut self, buffer: Duration) -> Self {
		self.refresh_buffer = buffer;

		self
	}

	/// Validates the configuration and builds the client.
	///
	/// The built-in in-memory cache starts its sweep task only when this runs inside a Tokio
	/// runtime.
	pub fn build(self) -> Result<Client> {
		let base_url = Url::parse(&self.base_url)
			.map_err(|source| ConfigError::InvalidUrl { endpoint: "base", source })?;
		let token_url = Url::parse(&self.token_url)
			.map_err(|source| ConfigError::InvalidUrl { endpoint: "token", source })?;
		let transport = match self.transport {
			Some(transport) => transport,
			None => default_transport(self.timeout)?,
		};
		let exchange = TokenExchange::new(
			&token_url,
			self.client_id.clone(),
			self.client_secret,
			Arc::clone(&transport),
		)?;
		let credentials = CredentialManager::new(exchange).with_refresh_buffer(self.refresh_buffer);
		let cache = match (self.cache_config.enabled, self.cache) {
			(_, Some(cache)) => Some(cache),
			(true, None) => Some(Arc::new(MemoryCache::new(self.cache_config.cleanup_interval))
				as Arc<dyn ResponseCache>),
			(false, None) => None,
		};

		Ok(Client {
			transport,
			base_url: base_url.as_str().trim_end_matches('/').to_owned(),
			client_id: self.client_id,
			credentials,
			rate_limiter: self.rate_limiter.unwrap_or_default(),
			retry: self.retry,
			cache,
			cache_config: self.cache_config,
			locale: RwLock::new(self.locale),
		})
	}
}
impl Debug for ClientBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientBuilder")
			.field("client_id", &self.client_id)
			.field("base_url", &self.base_url)
			.field("token_url", &self.token_url)
			.field("transport_set", &self.transport.is_some())
			.field("timeout", &self.timeout)
			.field("locale", &self.locale)
			.field("retry", &self.retry)
			.field("cache_config", &self.cache_config)
			.finish_non_exhaustive()
	}
}

#[cfg(feature = "reqwest")]
fn default_transport(timeout: StdDuration) -> Result<Arc<dyn HttpTransport>> {
	let transport = crate::http::ReqwestTransport::with_timeout(timeout)?;

	Ok(Arc::new(transport))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport(timeout: StdDuration) -> Result<Arc<dyn HttpTransport>> {
	let _ = timeout;

	Err(ConfigError::MissingTransport.into())
}
