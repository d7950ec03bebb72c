//! Resilient Digi-Key API client: OAuth 2.0 client-credentials with single-flight refresh,
//! dual-window quotas, retries with backoff, and TTL response caching composed around one
//! request pipeline.
//!
//! The entry point is [`client::Client`], built through [`client::ClientBuilder`]. Every call
//! takes a [`context::CallContext`] carrying the caller's cancellation signal and deadline.
//! Product search and details live in [`products`]; anything else can be issued through
//! [`client::Client::execute`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod context;
pub mod error;
pub mod http;
pub mod locale;
pub mod oauth;
pub mod obs;
pub mod products;
pub mod rate_limit;
pub mod retry;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use oauth2::http;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use client::{Client, ClientBuilder};
pub use context::CallContext;
pub use error::{Error, ErrorKind, Result};
pub use locale::Locale;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
