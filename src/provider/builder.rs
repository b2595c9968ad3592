// self
use crate::{
	_prelude::*,
	error::ConfigError,
	provider::{
		ProviderEndpoints, STRAVA_API_BASE_URL, STRAVA_AUTHORIZATION_URL, STRAVA_TOKEN_URL,
	},
};

/// Builder for [`ProviderEndpoints`] values.
#[derive(Debug, Default)]
pub struct ProviderEndpointsBuilder {
	/// Authorization endpoint override.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint override.
	pub token_endpoint: Option<Url>,
	/// API base override.
	pub api_base: Option<Url>,
}
impl ProviderEndpointsBuilder {
	/// Creates a builder that falls back to the production endpoints.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the REST API base.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting endpoints.
	pub fn build(self) -> Result<ProviderEndpoints, ConfigError> {
		let authorization = resolve(self.authorization_endpoint, STRAVA_AUTHORIZATION_URL)?;
		let token = resolve(self.token_endpoint, STRAVA_TOKEN_URL)?;
		let api_base = resolve(self.api_base, STRAVA_API_BASE_URL)?;
		let endpoints = ProviderEndpoints { authorization, token, api_base };

		endpoints.validate()?;

		Ok(endpoints)
	}
}

impl ProviderEndpoints {
	fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("authorization", &self.authorization)?;
		validate_endpoint("token", &self.token)?;
		validate_endpoint("api", &self.api_base)?;

		if self.api_base.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: self.api_base.to_string() });
		}

		Ok(())
	}
}

fn resolve(value: Option<Url>, fallback: &str) -> Result<Url, ConfigError> {
	match value {
		Some(url) => Ok(url),
		None => Url::parse(fallback).map_err(|source| ConfigError::InvalidEndpoint { source }),
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}
