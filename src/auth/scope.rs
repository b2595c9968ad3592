//! Scope modeling for the authorization request.

// std
use std::collections::BTreeSet;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// Delimiter the provider expects between scopes in the `scope` parameter.
pub const SCOPE_DELIMITER: char = ',';

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain whitespace or the delimiter.
	#[error("Scope contains a whitespace or delimiter character: {scope}.")]
	InvalidCharacter {
		/// The offending scope string.
		scope: String,
	},
}

/// Normalized set of OAuth scopes.
///
/// Scopes are deduplicated and sorted so equality and the rendered `scope` parameter stay
/// stable regardless of the order they were supplied in.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeSet(Arc<[String]>);
impl ScopeSet {
	/// Creates a normalized scope set from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Ok(Self(normalize(scopes)?))
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the normalized set contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.binary_search_by(|candidate| candidate.as_str().cmp(scope)).is_ok()
	}

	/// Iterator over normalized scopes.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.as_str())
	}

	/// Returns the provider representation (comma-delimited).
	pub fn normalized(&self) -> String {
		self.0.join(&SCOPE_DELIMITER.to_string())
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&self.0).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}

		Self::new(s.split(SCOPE_DELIMITER).map(str::trim))
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.normalized())
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		ScopeSet::from_str(&raw).map_err(DeError::custom)
	}
}

fn normalize<I, S>(scopes: I) -> Result<Arc<[String]>, ScopeValidationError>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut set = BTreeSet::new();

	for scope in scopes {
		let owned: String = scope.into();

		if owned.is_empty() {
			return Err(ScopeValidationError::Empty);
		}
		if owned.chars().any(|c| c.is_whitespace() || c == SCOPE_DELIMITER) {
			return Err(ScopeValidationError::InvalidCharacter { scope: owned });
		}

		set.insert(owned);
	}

	Ok(Arc::from(set.into_iter().collect::<Vec<_>>()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_normalize_and_join_with_commas() {
		let lhs = ScopeSet::new(["read", "activity:read_all", "read"])
			.expect("Left-hand scope set should be valid.");
		let rhs = ScopeSet::new(["activity:read_all", "read"])
			.expect("Right-hand scope set should be valid.");

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.normalized(), "activity:read_all,read");
	}

	#[test]
	fn scopes_reject_whitespace_and_delimiters() {
		let err = ScopeSet::new([" read "]).expect_err("Padded scopes must be rejected.");

		assert!(matches!(err, ScopeValidationError::InvalidCharacter { .. }));
		assert!(ScopeSet::new(["read,write"]).is_err());
		assert!(ScopeSet::new([""]).is_err());
	}

	#[test]
	fn parses_comma_delimited_strings() {
		let scopes = ScopeSet::from_str("read, activity:read_all")
			.expect("Scope string should parse successfully.");

		assert!(scopes.contains("read"));
		assert_eq!(scopes.iter().collect::<Vec<_>>(), vec!["activity:read_all", "read"]);
		assert!(ScopeSet::from_str("").expect("Empty input is an empty set.").is_empty());
		assert!(ScopeSet::from_str("read,,write").is_err());
	}

	#[test]
	fn serializes_as_provider_string() {
		let scopes =
			ScopeSet::new(["activity:read_all"]).expect("Scope fixture should be valid.");
		let json = serde_json::to_string(&scopes).expect("ScopeSet should serialize.");

		assert_eq!(json, "\"activity:read_all\"");

		let parsed: ScopeSet = serde_json::from_str(&json).expect("ScopeSet should deserialize.");

		assert_eq!(parsed, scopes);
	}
}
