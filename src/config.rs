//! Immutable client configuration injected into every component.
//!
//! Configuration is assembled once, either through [`ClientConfig::builder`] or from the
//! process environment via [`ClientConfig::from_env`], and never mutated afterwards.
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `STRAVA_CLIENT_ID` | yes | OAuth client identifier |
//! | `STRAVA_CLIENT_SECRET` | yes | OAuth client secret |
//! | `STRAVA_REDIRECT_URI` | yes | Callback URL registered with the provider |
//! | `STRAVA_ATHLETE_ID` | no | Athlete whose activities are listed |
//! | `GOAL_MILES` | no | Goal distance in miles (default 364) |
//! | `GOAL_ACTIVITY_NAME` | no | Exact activity name to count (default `Debt Walk`) |
//! | `STRAVA_SCOPE` | no | Comma-delimited scopes to request (default `activity:read_all`) |

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenSecret},
	error::ConfigError,
	provider::ProviderEndpoints,
};

/// Activity name counted toward the goal unless overridden.
pub const DEFAULT_ACTIVITY_NAME: &str = "Debt Walk";
/// Goal distance in miles unless overridden.
pub const DEFAULT_GOAL_MILES: f64 = 364.0;
/// Scope requested unless overridden.
pub const DEFAULT_SCOPE: &str = "activity:read_all";
/// Largest page the activities endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Process-wide client configuration.
#[derive(Clone)]
pub struct ClientConfig {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret; redacted in debug output.
	pub client_secret: TokenSecret,
	/// Callback URL the provider redirects to with `code`.
	pub redirect_uri: Url,
	/// Athlete whose activities are listed; `None` lists the authenticated athlete's.
	pub athlete_id: Option<u64>,
	/// Goal distance in miles.
	pub goal_miles: f64,
	/// Exact, case-sensitive activity name counted toward the goal.
	pub activity_name: String,
	/// Scopes requested during authorization.
	pub scope: ScopeSet,
	/// Provider endpoints.
	pub endpoints: ProviderEndpoints,
	/// Records requested per activities page.
	pub page_size: u32,
}
impl ClientConfig {
	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Loads configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_with(|key| std::env::var(key).ok())
	}

	/// Loads configuration through the provided lookup so tests never touch the real
	/// environment.
	pub fn from_env_with<F>(mut get: F) -> Result<Self, ConfigError>
	where
		F: FnMut(&str) -> Option<String>,
	{
		let mut require = |var: &'static str| get(var).ok_or(ConfigError::MissingVar(var));
		let client_id = require("STRAVA_CLIENT_ID")?;
		let client_secret = require("STRAVA_CLIENT_SECRET")?;
		let redirect_uri = require("STRAVA_REDIRECT_URI")?;
		let redirect_uri = Url::parse(&redirect_uri).map_err(|e| ConfigError::InvalidVar {
			var: "STRAVA_REDIRECT_URI",
			reason: e.to_string(),
		})?;
		let mut builder = Self::builder()
			.client_id(client_id)
			.client_secret(client_secret)
			.redirect_uri(redirect_uri);

		if let Some(raw) = get("STRAVA_ATHLETE_ID") {
			builder = builder.athlete_id(parse_var("STRAVA_ATHLETE_ID", &raw)?);
		}
		if let Some(raw) = get("GOAL_MILES") {
			builder = builder.goal_miles(parse_var("GOAL_MILES", &raw)?);
		}
		if let Some(name) = get("GOAL_ACTIVITY_NAME") {
			builder = builder.activity_name(name);
		}
		if let Some(raw) = get("STRAVA_SCOPE") {
			builder = builder.scope(raw.parse()?);
		}

		builder.build()
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("athlete_id", &self.athlete_id)
			.field("goal_miles", &self.goal_miles)
			.field("activity_name", &self.activity_name)
			.field("scope", &self.scope)
			.field("page_size", &self.page_size)
			.finish()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	client_id: Option<String>,
	client_secret: Option<TokenSecret>,
	redirect_uri: Option<Url>,
	athlete_id: Option<u64>,
	goal_miles: Option<f64>,
	activity_name: Option<String>,
	scope: Option<ScopeSet>,
	endpoints: Option<ProviderEndpoints>,
	page_size: Option<u32>,
}
impl ClientConfigBuilder {
	/// Sets the OAuth client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, value: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(value));

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Targets a specific athlete's activity list.
	pub fn athlete_id(mut self, id: u64) -> Self {
		self.athlete_id = Some(id);

		self
	}

	/// Overrides the goal distance (miles).
	pub fn goal_miles(mut self, miles: f64) -> Self {
		self.goal_miles = Some(miles);

		self
	}

	/// Overrides the activity name counted toward the goal.
	pub fn activity_name(mut self, name: impl Into<String>) -> Self {
		self.activity_name = Some(name.into());

		self
	}

	/// Overrides the requested scopes.
	pub fn scope(mut self, scope: ScopeSet) -> Self {
		self.scope = Some(scope);

		self
	}

	/// Overrides the provider endpoints.
	pub fn endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
		self.endpoints = Some(endpoints);

		self
	}

	/// Overrides the activities page size.
	pub fn page_size(mut self, size: u32) -> Self {
		self.page_size = Some(size);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let client_id =
			self.client_id.filter(|id| !id.trim().is_empty()).ok_or(ConfigError::MissingClientId)?;
		let client_secret = self
			.client_secret
			.filter(|secret| !secret.is_empty())
			.ok_or(ConfigError::MissingClientSecret)?;
		let redirect_uri = self.redirect_uri.ok_or(ConfigError::MissingRedirectUri)?;
		let goal_miles = self.goal_miles.unwrap_or(DEFAULT_GOAL_MILES);

		if !goal_miles.is_finite() || goal_miles < 0.0 {
			return Err(ConfigError::InvalidGoal { value: goal_miles });
		}

		let activity_name =
			self.activity_name.unwrap_or_else(|| DEFAULT_ACTIVITY_NAME.to_owned());

		if activity_name.is_empty() {
			return Err(ConfigError::EmptyActivityName);
		}

		let page_size = self.page_size.unwrap_or(MAX_PAGE_SIZE);

		if page_size == 0 || page_size > MAX_PAGE_SIZE {
			return Err(ConfigError::InvalidPageSize { value: page_size, max: MAX_PAGE_SIZE });
		}

		let scope = match self.scope {
			Some(scope) => scope,
			None => ScopeSet::new([DEFAULT_SCOPE])?,
		};
		let endpoints = match self.endpoints {
			Some(endpoints) => endpoints,
			None => ProviderEndpoints::strava()?,
		};

		Ok(ClientConfig {
			client_id,
			client_secret,
			redirect_uri,
			athlete_id: self.athlete_id,
			goal_miles,
			activity_name,
			scope,
			endpoints,
			page_size,
		})
	}
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: Display,
{
	raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar { var, reason: e.to_string() })
}
