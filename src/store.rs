//! Key-value storage capability and the session record persisted through it.
//!
//! A successful callback writes three string entries: the access token, the refresh
//! token, and the athlete profile serialized as JSON. Hosts choose the backend by
//! implementing [`KeyValueStore`].

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	api::AthleteProfile,
	auth::{TokenPair, TokenSecret},
};

/// Key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "stravaAccessToken";
/// Key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "stravaRefreshToken";
/// Key holding the JSON-serialized athlete profile.
pub const ATHLETE_KEY: &str = "stravaAthlete";

/// Boxed future returned by [`KeyValueStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// String key-value storage backend.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

	/// Stores or replaces the value under `key`.
	fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()>;

	/// Removes `key`; absent keys are not an error.
	fn clear<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`KeyValueStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend or the session codec.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Session restored from storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredSession {
	/// Persisted tokens.
	pub tokens: TokenPair,
	/// Persisted athlete profile.
	pub athlete: AthleteProfile,
}

/// Writes the three session entries.
pub async fn persist_session(
	store: &dyn KeyValueStore,
	tokens: &TokenPair,
	athlete: &AthleteProfile,
) -> Result<(), StoreError> {
	let athlete_json = serde_json::to_string(athlete)
		.map_err(|e| StoreError::Serialization { message: format!("athlete profile: {e}") })?;

	store.set(ACCESS_TOKEN_KEY, tokens.access_token.expose().to_owned()).await?;
	store.set(REFRESH_TOKEN_KEY, tokens.refresh_token.expose().to_owned()).await?;
	store.set(ATHLETE_KEY, athlete_json).await
}

/// Reads the session back; `None` unless all three entries are present.
pub async fn load_session(store: &dyn KeyValueStore) -> Result<Option<StoredSession>, StoreError> {
	let (Some(access), Some(refresh), Some(athlete_json)) = (
		store.get(ACCESS_TOKEN_KEY).await?,
		store.get(REFRESH_TOKEN_KEY).await?,
		store.get(ATHLETE_KEY).await?,
	) else {
		return Ok(None);
	};
	let athlete = serde_json::from_str(&athlete_json)
		.map_err(|e| StoreError::Serialization { message: format!("athlete profile: {e}") })?;

	Ok(Some(StoredSession {
		tokens: TokenPair {
			access_token: TokenSecret::new(access),
			refresh_token: TokenSecret::new(refresh),
		},
		athlete,
	}))
}

/// Removes all three session entries.
pub async fn clear_session(store: &dyn KeyValueStore) -> Result<(), StoreError> {
	for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ATHLETE_KEY] {
		store.clear(key).await?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn athlete() -> AthleteProfile {
		AthleteProfile {
			id: 5,
			firstname: "Ada".into(),
			lastname: "Walker".into(),
			name: "Ada Walker".into(),
			city: Some("Boston".into()),
			state: None,
			profile_medium: None,
			profile: None,
		}
	}

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "disk unplugged".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unplugged"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the wrapped store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[tokio::test]
	async fn session_round_trips_through_three_keys() {
		let store = MemoryStore::default();
		let tokens = TokenPair::new("access-1", "refresh-1");

		persist_session(&store, &tokens, &athlete()).await.expect("Persisting should succeed.");

		assert_eq!(store.len(), 3);
		assert_eq!(
			store.get(ACCESS_TOKEN_KEY).await.expect("Read should succeed.").as_deref(),
			Some("access-1")
		);

		let raw = store
			.get(ATHLETE_KEY)
			.await
			.expect("Read should succeed.")
			.expect("Athlete entry should exist.");
		let json: serde_json::Value = serde_json::from_str(&raw).expect("Entry should be JSON.");

		assert_eq!(json["name"], "Ada Walker");

		let restored = load_session(&store)
			.await
			.expect("Loading should succeed.")
			.expect("Session should be complete.");

		assert_eq!(restored.tokens, tokens);
		assert_eq!(restored.athlete, athlete());

		clear_session(&store).await.expect("Clearing should succeed.");

		assert!(load_session(&store).await.expect("Loading should succeed.").is_none());
	}

	#[tokio::test]
	async fn partial_sessions_are_ignored_and_bad_json_is_reported() {
		let store = MemoryStore::default();

		store.set(ACCESS_TOKEN_KEY, "a".into()).await.expect("Write should succeed.");

		assert!(load_session(&store).await.expect("Loading should succeed.").is_none());

		store.set(REFRESH_TOKEN_KEY, "r".into()).await.expect("Write should succeed.");
		store.set(ATHLETE_KEY, "{not json".into()).await.expect("Write should succeed.");

		let err = load_session(&store).await.expect_err("Corrupt profile must fail.");

		assert!(matches!(err, StoreError::Serialization { .. }));
	}
}
