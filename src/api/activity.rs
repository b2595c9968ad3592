//! Activity summaries returned by the athlete activities endpoint.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::Error as SerError};
use time::format_description::well_known::Rfc3339;
// self
use crate::_prelude::*;

/// Single recorded exercise session. Unknown provider fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
	/// Provider identifier.
	pub id: u64,
	/// Athlete-chosen activity name.
	pub name: String,
	/// Distance in meters.
	pub distance: f64,
	/// Start instant.
	#[serde(with = "rfc3339")]
	pub start_date: OffsetDateTime,
	/// Moving duration in seconds.
	pub moving_time: u64,
	/// Elevation gain in meters, when the provider recorded one.
	#[serde(default)]
	pub total_elevation_gain: Option<f64>,
}
impl Activity {
	/// Exact, case-sensitive name comparison used for goal filtering.
	pub fn is_named(&self, target: &str) -> bool {
		self.name == target
	}

	/// Same comparison on an undecoded page record, so records that will be discarded
	/// never have to match the strict shape.
	pub(crate) fn record_is_named(record: &serde_json::Value, target: &str) -> bool {
		record.get("name").and_then(serde_json::Value::as_str) == Some(target)
	}
}

mod rfc3339 {
	// self
	use super::*;

	pub(super) fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let formatted = value.format(&Rfc3339).map_err(S::Error::custom)?;

		serializer.serialize_str(&formatted)
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		OffsetDateTime::parse(&raw, &Rfc3339).map_err(DeError::custom)
	}
}
