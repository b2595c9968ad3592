//! Goal progress aggregation over filtered activities.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{_prelude::*, api::Activity};

/// Meters per statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Progress toward the goal derived from a filtered activity list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
	/// Total miles, two decimals.
	pub total_distance: String,
	/// Goal minus the unrounded total; negative once the goal is exceeded.
	pub remaining_miles: f64,
	/// Number of counted activities.
	pub activity_count: usize,
	/// Per-activity display rows, in input order.
	pub activities: Vec<ActivityView>,
}

/// Display row for a single counted activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
	/// Activity name.
	pub name: String,
	/// Start instant (RFC 3339).
	pub date: String,
	/// Miles, two decimals.
	pub distance: String,
	/// Moving time in seconds.
	pub moving_time: u64,
	/// Elevation gain in meters, two decimals.
	pub elevation_gain: String,
	/// Provider identifier.
	pub id: u64,
}
impl From<&Activity> for ActivityView {
	fn from(activity: &Activity) -> Self {
		Self {
			name: activity.name.clone(),
			date: activity
				.start_date
				.format(&Rfc3339)
				.unwrap_or_else(|_| activity.start_date.to_string()),
			distance: two_decimals(meters_to_miles(activity.distance)),
			moving_time: activity.moving_time,
			elevation_gain: two_decimals(activity.total_elevation_gain.unwrap_or(0.0)),
			id: activity.id,
		}
	}
}

/// Reduces `activities` into totals against `goal_miles`.
///
/// Rounding only applies to the display strings; `remaining_miles` is computed from the
/// full-precision sum.
pub fn aggregate(activities: &[Activity], goal_miles: f64) -> StatsSummary {
	let total_miles: f64 =
		activities.iter().map(|activity| meters_to_miles(activity.distance)).sum();

	StatsSummary {
		total_distance: two_decimals(total_miles),
		remaining_miles: goal_miles - total_miles,
		activity_count: activities.len(),
		activities: activities.iter().map(ActivityView::from).collect(),
	}
}

/// Converts meters to miles.
pub fn meters_to_miles(meters: f64) -> f64 {
	meters / METERS_PER_MILE
}

/// Formats with two decimals, rounding exact halves away from zero.
///
/// `{:.2}` already rounds the exact binary value correctly; it only differs on exact
/// ties, where it picks the even digit. A third-decimal tie is representable only when
/// `value * 8` is an odd integer (0.125, 0.375, ...), so only those are adjusted.
fn two_decimals(value: f64) -> String {
	let eighths = value * 8.0;

	if eighths.fract() != 0.0 || eighths % 2.0 == 0.0 {
		return format!("{value:.2}");
	}

	let hundredths = (value.abs() * 100.0).ceil() as u64;
	let sign = if value < 0.0 { "-" } else { "" };

	format!("{sign}{}.{:02}", hundredths / 100, hundredths % 100)
}
