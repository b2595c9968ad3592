//! Paginated activity reads filtered by exact name.
//!
//! Pages are requested strictly one after another, starting at page 1. Only an empty
//! page ends the walk: a short page is still followed by one more request.

// self
use crate::{
	_prelude::*,
	api::Activity,
	auth::TokenSecret,
	flows::Tracker,
	http,
	obs::{self, FlowKind},
};

/// Lazy, non-restartable walk over the athlete's activity pages.
///
/// Each call to [`ActivityPager::next_batch`] issues one request and yields that page's
/// matching activities, which may be empty when nothing on the page matched. Once a page
/// comes back empty or a request fails, the pager yields nothing more.
pub struct ActivityPager<'a> {
	tracker: &'a Tracker,
	url: Url,
	access_token: TokenSecret,
	target_name: String,
	page: u32,
	done: bool,
}
impl ActivityPager<'_> {
	/// Next page number to request.
	pub fn page(&self) -> u32 {
		self.page
	}

	/// Returns true once the walk has ended.
	pub fn is_done(&self) -> bool {
		self.done
	}

	/// Fetches the next page and keeps the activities whose name matches exactly.
	pub async fn next_batch(&mut self) -> Result<Option<Vec<Activity>>> {
		if self.done {
			return Ok(None);
		}

		let query = [
			("per_page", self.tracker.config.page_size.to_string()),
			("page", self.page.to_string()),
		];
		let records: Vec<serde_json::Value> = match self
			.tracker
			.http_client
			.get_json(self.url.clone(), self.access_token.expose(), &query)
			.await
		{
			Ok(records) => records,
			Err(e) => {
				self.done = true;

				return Err(Error::Fetch(e));
			},
		};

		if records.is_empty() {
			self.done = true;

			return Ok(None);
		}

		self.page += 1;

		// Only matching records are held to the strict shape.
		let matched = records
			.into_iter()
			.filter(|record| Activity::record_is_named(record, &self.target_name))
			.map(http::decode_value::<Activity>)
			.collect::<Result<Vec<_>, _>>();

		match matched {
			Ok(matched) => Ok(Some(matched)),
			Err(e) => {
				self.done = true;

				Err(Error::Fetch(e))
			},
		}
	}
}
impl Debug for ActivityPager<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ActivityPager")
			.field("url", &self.url.as_str())
			.field("target_name", &self.target_name)
			.field("page", &self.page)
			.field("done", &self.done)
			.finish()
	}
}

impl Tracker {
	/// Starts a paginated walk over the configured athlete's activities.
	///
	/// Lists `/athletes/{id}/activities` when an athlete id is configured and the
	/// authenticated athlete's `/athlete/activities` otherwise.
	pub fn named_activities(
		&self,
		access_token: &str,
		target_name: impl Into<String>,
	) -> Result<ActivityPager<'_>> {
		let endpoints = &self.config.endpoints;
		let url = match self.config.athlete_id {
			Some(id) => {
				let id = id.to_string();

				endpoints.api_url(["athletes", id.as_str(), "activities"])
			},
			None => endpoints.api_url(["athlete", "activities"]),
		}?;

		Ok(ActivityPager {
			tracker: self,
			url,
			access_token: TokenSecret::new(access_token),
			target_name: target_name.into(),
			page: 1,
			done: false,
		})
	}

	/// Drains [`Tracker::named_activities`] into a single list in provider order.
	///
	/// The first failing page aborts the whole read; no partial list is returned.
	pub async fn fetch_named_activities(
		&self,
		access_token: &str,
		target_name: &str,
	) -> Result<Vec<Activity>> {
		const KIND: FlowKind = FlowKind::Activities;

		obs::observe(KIND, "fetch_named_activities", async move {
			let mut pager = self.named_activities(access_token, target_name)?;
			let mut matched = Vec::new();

			while let Some(batch) = pager.next_batch().await? {
				matched.extend(batch);
			}

			#[cfg(feature = "tracing")]
			tracing::debug!(
				requests = pager.page(),
				matched = matched.len(),
				"activity pagination finished"
			);

			Ok(matched)
		})
		.await
	}
}
