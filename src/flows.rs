//! Provider flows driven by the tracker and the callback orchestrator.

pub mod activities;
pub mod callback;

mod exchange;
mod profile;

pub use activities::*;
pub use callback::*;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	http::ReqwestHttpClient,
	oauth,
	stats::{self, StatsSummary},
};

/// Entry point for every provider call.
///
/// The tracker owns the HTTP client and the immutable configuration; flow
/// implementations live in the submodules of [`crate::flows`] as additional `impl`
/// blocks.
#[derive(Clone, Debug)]
pub struct Tracker {
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: ReqwestHttpClient,
	config: Arc<ClientConfig>,
}
impl Tracker {
	/// Creates a tracker that provisions its own reqwest client.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}

	/// Creates a tracker that reuses the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: ReqwestHttpClient) -> Self {
		Self { http_client, config: Arc::new(config) }
	}

	/// Configuration the tracker was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Authorization URL the user must visit to grant access.
	pub fn authorization_url(&self) -> Url {
		oauth::build_authorize_url(&self.config)
	}

	/// Fetches the configured activity name and reduces it against the configured goal.
	pub async fn goal_stats(&self, access_token: &str) -> Result<StatsSummary> {
		let activities =
			self.fetch_named_activities(access_token, &self.config.activity_name).await?;

		Ok(stats::aggregate(&activities, self.config.goal_miles))
	}
}
