//! Access/refresh token pair returned by the authorization code exchange.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Tokens issued for the authenticated athlete.
///
/// The access token authorizes subsequent API calls. The refresh token is kept so a
/// caller can mint new access tokens; this crate never performs that exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived bearer credential.
	pub access_token: TokenSecret,
	/// Long-lived credential used to mint new access tokens.
	pub refresh_token: TokenSecret,
}
impl TokenPair {
	/// Wraps raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}
}
