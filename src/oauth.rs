//! OAuth client facade: authorization URL construction and the code-for-token exchange.

pub use oauth2;

// std
use std::time::Duration as StdDuration;
// crates.io
use oauth2::{
	AccessToken, AuthType, AuthorizationCode, Client, ClientId, ClientSecret, EndpointNotSet,
	EndpointSet, HttpClientError, RefreshToken, RequestTokenError, Scope, StandardRevocableToken,
	TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
};
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	config::ClientConfig,
	error::{ConfigError, RequestError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type TokenClient = Client<
	BasicErrorResponse,
	ExchangeTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;

/// Token endpoint body.
///
/// Only `access_token` is required. A missing `token_type` reads as bearer and the
/// comparison is case-insensitive; extra provider fields such as `athlete` are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ExchangeTokenResponse {
	access_token: AccessToken,
	#[serde(default = "bearer", deserialize_with = "deserialize_token_type")]
	token_type: BasicTokenType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	expires_in: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	refresh_token: Option<RefreshToken>,
}
impl TokenResponse for ExchangeTokenResponse {
	type TokenType = BasicTokenType;

	fn access_token(&self) -> &AccessToken {
		&self.access_token
	}

	fn token_type(&self) -> &Self::TokenType {
		&self.token_type
	}

	fn expires_in(&self) -> Option<StdDuration> {
		self.expires_in.map(StdDuration::from_secs)
	}

	fn refresh_token(&self) -> Option<&RefreshToken> {
		self.refresh_token.as_ref()
	}

	fn scopes(&self) -> Option<&Vec<Scope>> {
		None
	}
}

fn bearer() -> BasicTokenType {
	BasicTokenType::Bearer
}

fn deserialize_token_type<'de, D>(deserializer: D) -> Result<BasicTokenType, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<String>::deserialize(deserializer)?;

	Ok(match raw {
		None => BasicTokenType::Bearer,
		Some(raw) if raw.eq_ignore_ascii_case("bearer") => BasicTokenType::Bearer,
		Some(raw) if raw.eq_ignore_ascii_case("mac") => BasicTokenType::Mac,
		Some(raw) => BasicTokenType::Extension(raw),
	})
}

/// Builds the provider authorization URL from the configuration.
///
/// Every call forces the consent screen (`approval_prompt=force`) so the athlete can
/// re-grant the read scope.
pub fn build_authorize_url(config: &ClientConfig) -> Url {
	let mut url = config.endpoints.authorization.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("redirect_uri", config.redirect_uri.as_str());
	pairs.append_pair("response_type", "code");

	if !config.scope.is_empty() {
		pairs.append_pair("scope", &config.scope.normalized());
	}

	pairs.append_pair("approval_prompt", "force");

	drop(pairs);

	url
}

/// Token endpoint facade sending client credentials in the form body.
pub(crate) struct TokenExchangeFacade {
	oauth_client: TokenClient,
	http_client: ReqwestHttpClient,
}
impl TokenExchangeFacade {
	pub(crate) fn from_config(
		config: &ClientConfig,
		http_client: ReqwestHttpClient,
	) -> Result<Self, ConfigError> {
		let token_url = TokenUrl::new(config.endpoints.token.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let oauth_client = Client::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_token_uri(token_url);

		Ok(Self { oauth_client, http_client })
	}

	/// POSTs `grant_type=authorization_code` with the code and client credentials.
	pub(crate) async fn exchange_code(&self, code: &str) -> Result<TokenPair, RequestError> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;
		let refresh = response
			.refresh_token()
			.ok_or(RequestError::MissingField { field: "refresh_token" })?;

		Ok(TokenPair::new(response.access_token().secret().as_str(), refresh.secret().as_str()))
	}
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> RequestError {
	// A recorded failure status wins over whatever oauth2 made of the body.
	if let Some(status) = meta.as_ref().filter(|meta| meta.is_failure()).and_then(|m| m.status) {
		return RequestError::from_status(status);
	}

	match err {
		RequestTokenError::Request(error) => map_transport_error(error),
		RequestTokenError::Parse(source, _body) => RequestError::Decode { source },
		RequestTokenError::ServerResponse(response) => RequestError::Unexpected {
			message: format!("OAuth error `{}`", response.error().as_ref()),
		},
		RequestTokenError::Other(message) => RequestError::Unexpected { message },
	}
}

fn map_transport_error(err: HttpClientError<ReqwestError>) -> RequestError {
	match err {
		HttpClientError::Reqwest(inner) => TransportError::from(*inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Http(inner) => RequestError::Unexpected {
			message: format!("request could not be built: {inner}"),
		},
		HttpClientError::Other(message) => RequestError::Unexpected { message },
		_ => RequestError::Unexpected { message: "unknown HTTP client failure".into() },
	}
}
