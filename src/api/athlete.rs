//! Authenticated athlete profile.

// self
use crate::_prelude::*;

/// Profile of the authenticated athlete, persisted as JSON alongside the tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteProfile {
	/// Provider identifier.
	pub id: u64,
	/// Given name.
	pub firstname: String,
	/// Family name.
	pub lastname: String,
	/// `"firstname lastname"`.
	pub name: String,
	/// City, when public.
	pub city: Option<String>,
	/// State or region, when public.
	pub state: Option<String>,
	/// Medium-size avatar URL.
	pub profile_medium: Option<String>,
	/// Full-size avatar URL.
	pub profile: Option<String>,
}
impl From<AthleteRecord> for AthleteProfile {
	fn from(record: AthleteRecord) -> Self {
		let name = format!("{} {}", record.firstname, record.lastname);

		Self {
			id: record.id,
			firstname: record.firstname,
			lastname: record.lastname,
			name,
			city: record.city,
			state: record.state,
			profile_medium: record.profile_medium,
			profile: record.profile,
		}
	}
}

/// Wire shape of `GET /athlete`.
#[derive(Clone, Debug, Deserialize)]
pub struct AthleteRecord {
	/// Provider identifier.
	pub id: u64,
	/// Given name.
	#[serde(default)]
	pub firstname: String,
	/// Family name.
	#[serde(default)]
	pub lastname: String,
	/// City.
	#[serde(default)]
	pub city: Option<String>,
	/// State or region.
	#[serde(default)]
	pub state: Option<String>,
	/// Full-size avatar URL.
	#[serde(default)]
	pub profile: Option<String>,
	/// Medium-size avatar URL.
	#[serde(default)]
	pub profile_medium: Option<String>,
}
