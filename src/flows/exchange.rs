// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	error::RequestError,
	flows::Tracker,
	oauth::TokenExchangeFacade,
	obs::{self, FlowKind},
};

impl Tracker {
	/// Exchanges a callback authorization code for an access/refresh token pair.
	///
	/// Client credentials travel in the form body next to
	/// `grant_type=authorization_code`. An empty code fails without touching the network.
	pub async fn exchange_code(&self, code: &str) -> Result<TokenPair> {
		const KIND: FlowKind = FlowKind::TokenExchange;

		obs::observe(KIND, "exchange_code", async move {
			if code.is_empty() {
				return Err(Error::Auth(RequestError::MissingField { field: "code" }));
			}

			let facade = TokenExchangeFacade::from_config(&self.config, self.http_client.clone())?;

			facade.exchange_code(code).await.map_err(Error::Auth)
		})
		.await
	}
}
