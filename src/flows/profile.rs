// self
use crate::{
	_prelude::*,
	api::{AthleteProfile, AthleteRecord},
	flows::Tracker,
	obs::{self, FlowKind},
};

impl Tracker {
	/// Reads the authenticated athlete (`GET /athlete`).
	pub async fn fetch_profile(&self, access_token: &str) -> Result<AthleteProfile> {
		const KIND: FlowKind = FlowKind::Profile;

		obs::observe(KIND, "fetch_profile", async move {
			let url = self.config.endpoints.api_url(["athlete"])?;
			let record: AthleteRecord =
				self.http_client.get_json(url, access_token, &[]).await.map_err(Error::Profile)?;

			Ok(record.into())
		})
		.await
	}
}
