//! Provider endpoint set shared by every flow.
//!
//! Endpoints default to Strava's production hosts. Tests and self-hosted proxies
//! override them through [`ProviderEndpointsBuilder`].

/// Builder API for assembling provider endpoints.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Production authorization endpoint.
pub const STRAVA_AUTHORIZATION_URL: &str = "https://www.strava.com/oauth/authorize";
/// Production token endpoint.
pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
/// Production REST API root.
pub const STRAVA_API_BASE_URL: &str = "https://www.strava.com/api/v3";

/// Endpoint set used by the tracker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the user is redirected to.
	pub authorization: Url,
	/// Token endpoint used for code exchanges.
	pub token: Url,
	/// Root of the REST API (`/athlete`, `/athletes/{id}/activities`).
	pub api_base: Url,
}
impl ProviderEndpoints {
	/// Creates a new builder seeded with the production endpoints.
	pub fn builder() -> ProviderEndpointsBuilder {
		ProviderEndpointsBuilder::new()
	}

	/// Production endpoints.
	pub fn strava() -> Result<Self, ConfigError> {
		Self::builder().build()
	}

	/// Resolves an API resource by appending `segments` to the API base path.
	pub fn api_url<I, S>(&self, segments: I) -> Result<Url, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::CannotBeABase { url: self.api_base.to_string() })?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}
}
