//! Strava OAuth client that exchanges callback codes, pages through an athlete's activities,
//! and measures named activities against a distance goal.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod stats;
pub mod store;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests and demos.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ScopeSet,
		config::ClientConfig,
		error::ConfigError,
		flows::{AuthOrchestrator, Tracker},
		http::ReqwestHttpClient,
		provider::ProviderEndpoints,
		store::{KeyValueStore, MemoryStore},
	};

	/// Client identifier used by test configurations.
	pub const TEST_CLIENT_ID: &str = "client-it";
	/// Client secret used by test configurations.
	pub const TEST_CLIENT_SECRET: &str = "secret-it";
	/// Athlete identifier used by test configurations.
	pub const TEST_ATHLETE_ID: u64 = 42;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> Result<ReqwestHttpClient> {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.build()
			.map_err(ConfigError::from)?;

		Ok(ReqwestHttpClient::with_client(client))
	}

	/// Provider endpoints rooted at a mock server base URL (e.g. `http://127.0.0.1:1234`).
	pub fn test_endpoints(base: &str) -> Result<ProviderEndpoints> {
		let base = base.trim_end_matches('/');
		let parse = |path: &str| {
			Url::parse(&format!("{base}{path}"))
				.map_err(|source| ConfigError::InvalidEndpoint { source })
		};

		Ok(ProviderEndpoints::builder()
			.authorization_endpoint(parse("/oauth/authorize")?)
			.token_endpoint(parse("/oauth/token")?)
			.api_base(parse("/api/v3")?)
			.build()?)
	}

	/// Client configuration pointed at a mock server.
	pub fn test_config(base: &str) -> Result<ClientConfig> {
		let redirect = Url::parse("https://app.example.com/callback")
			.map_err(|source| ConfigError::InvalidRedirect { source })?;

		Ok(ClientConfig::builder()
			.client_id(TEST_CLIENT_ID)
			.client_secret(TEST_CLIENT_SECRET)
			.redirect_uri(redirect)
			.athlete_id(TEST_ATHLETE_ID)
			.scope(ScopeSet::new(["activity:read_all"]).map_err(ConfigError::from)?)
			.endpoints(test_endpoints(base)?)
			.build()?)
	}

	/// Constructs a [`Tracker`] against a mock server base URL.
	pub fn build_test_tracker(base: &str) -> Result<Tracker> {
		Ok(Tracker::with_http_client(test_config(base)?, test_reqwest_http_client()?))
	}

	/// Constructs an [`AuthOrchestrator`] backed by an in-memory store.
	pub fn build_test_orchestrator(base: &str) -> Result<(AuthOrchestrator, Arc<MemoryStore>)> {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn KeyValueStore> = store_backend.clone();
		let orchestrator = AuthOrchestrator::new(build_test_tracker(base)?, store);

		Ok((orchestrator, store_backend))
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
