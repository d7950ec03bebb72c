#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
use tokio::time::Instant;
// self
use digikey_client::{
	Client, ClientBuilder,
	error::ConfigError,
	http::{HttpTransport, TransportFuture},
	oauth::oauth2::{HttpRequest, HttpResponse, http::Response},
};

pub const TOKEN_URL: &str = "https://auth.test/v1/oauth2/token";
pub const BASE_URL: &str = "https://api.test";

/// Canned API response.
#[derive(Clone, Debug)]
pub struct Scripted {
	pub status: u16,
	pub headers: Vec<(&'static str, String)>,
	pub body: String,
	pub delay: Duration,
}
impl Scripted {
	pub fn json(status: u16, body: impl Into<String>) -> Self {
		Self { status, headers: Vec::new(), body: body.into(), delay: Duration::ZERO }
	}

	pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}

	pub fn delayed(mut self, delay: Duration) -> Self {
		self.delay = delay;

		self
	}
}

/// Request observed by [`ScriptedTransport`].
#[derive(Clone, Debug)]
pub struct Recorded {
	pub at: Instant,
	pub method: String,
	pub uri: String,
	pub headers: Vec<(String, String)>,
	pub body: Vec<u8>,
}
impl Recorded {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Transport that answers token requests with `token-N` grants and API requests from a script.
///
/// Once the script runs dry every API request gets an empty JSON object.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
	token_calls: AtomicUsize,
	token_delay: Mutex<Duration>,
	script: Mutex<VecDeque<Scripted>>,
	api_calls: Mutex<Vec<Recorded>>,
}
impl ScriptedTransport {
	pub fn new(script: impl IntoIterator<Item = Scripted>) -> Arc<Self> {
		Arc::new(Self { script: Mutex::new(script.into_iter().collect()), ..Default::default() })
	}

	pub fn with_token_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
		*self.token_delay.lock() = delay;

		self
	}

	pub fn token_calls(&self) -> usize {
		self.token_calls.load(Ordering::SeqCst)
	}

	pub fn api_calls(&self) -> Vec<Recorded> {
		self.api_calls.lock().clone()
	}

	pub fn api_call_count(&self) -> usize {
		self.api_calls.lock().len()
	}
}
impl HttpTransport for ScriptedTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			if request.uri().to_string() == TOKEN_URL {
				let n = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
				let delay = *self.token_delay.lock();

				tokio::time::sleep(delay).await;

				let body = format!(
					r#"{{"access_token":"token-{n}","token_type":"Bearer","expires_in":3600}}"#
				);

				return Ok(Response::builder()
					.status(200)
					.header("content-type", "application/json")
					.body(body.into_bytes())
					.map_err(ConfigError::from)?);
			}

			self.api_calls.lock().push(Recorded {
				at: Instant::now(),
				method: request.method().to_string(),
				uri: request.uri().to_string(),
				headers: request
					.headers()
					.iter()
					.map(|(name, value)| {
						(name.to_string(), value.to_str().unwrap_or_default().to_owned())
					})
					.collect(),
				body: request.body().clone(),
			});

			let next = self.script.lock().pop_front().unwrap_or_else(|| Scripted::json(200, "{}"));

			tokio::time::sleep(next.delay).await;

			let mut response = Response::builder()
				.status(next.status)
				.header("content-type", "application/json");

			for (name, value) in &next.headers {
				response = response.header(*name, value.as_str());
			}

			let response: HttpResponse =
				response.body(next.body.into_bytes()).map_err(ConfigError::from)?;

			Ok(response)
		})
	}
}

pub fn builder(transport: Arc<ScriptedTransport>) -> ClientBuilder {
	Client::builder("test-client", "test-secret")
		.base_url(BASE_URL)
		.token_url(TOKEN_URL)
		.transport(transport)
}
