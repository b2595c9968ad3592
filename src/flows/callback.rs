//! Callback handling: turns a navigation URL carrying `code` into a persisted session.
//!
//! [`AuthOrchestrator::initialize`] is the only operation in the crate that converts
//! failures into data. Everything it calls propagates errors with `?`; the orchestrator
//! catches them at its boundary and reports an [`AuthResult::Failure`].

// crates.io
use serde::{Serializer, ser::SerializeStruct};
// self
use crate::{
	_prelude::*,
	api::AthleteProfile,
	auth::TokenPair,
	flows::Tracker,
	obs::{self, FlowKind},
	store::{self, KeyValueStore, StoredSession},
};

/// Tokens and profile of an authenticated athlete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
	/// Tokens issued by the exchange.
	pub tokens: TokenPair,
	/// Profile read right after the exchange.
	pub athlete: AthleteProfile,
}
impl From<StoredSession> for AuthSession {
	fn from(stored: StoredSession) -> Self {
		Self { tokens: stored.tokens, athlete: stored.athlete }
	}
}

/// Orchestrator state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
	/// No session yet; the user still has to approve access.
	AwaitingCallback,
	/// A callback completed; terminal for the lifetime of the orchestrator.
	Authenticated(AuthSession),
}

/// Structured result of a callback attempt.
///
/// Serializes as `{"success":true,"athlete":{..}}` or `{"success":false,"error":".."}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthResult {
	/// Tokens exchanged, profile fetched and persisted.
	Success(AuthSession),
	/// Some step failed; nothing was persisted by the failing attempt.
	Failure {
		/// Display message of the failing step.
		error: String,
	},
}
impl AuthResult {
	/// Returns true for [`AuthResult::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}
}
impl Serialize for AuthResult {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut state = serializer.serialize_struct("AuthResult", 2)?;

		match self {
			Self::Success(session) => {
				state.serialize_field("success", &true)?;
				state.serialize_field("athlete", &session.athlete)?;
			},
			Self::Failure { error } => {
				state.serialize_field("success", &false)?;
				state.serialize_field("error", error)?;
			},
		}

		state.end()
	}
}

/// What [`AuthOrchestrator::initialize`] did with the navigation URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
	/// No callback code was present; send the user to `authorize_url`.
	AwaitingCallback {
		/// Authorization URL to redirect the user to.
		authorize_url: Url,
	},
	/// A callback was handled, successfully or not.
	Completed(AuthResult),
}

/// Reads a non-empty `code` query parameter from a navigation URL.
pub fn authorization_code_from_url(url: &Url) -> Option<String> {
	url.query_pairs()
		.find(|(key, _)| key == "code")
		.map(|(_, value)| value.into_owned())
		.filter(|code| !code.is_empty())
}

/// Two-state callback machine composing exchange, profile read, and persistence.
pub struct AuthOrchestrator {
	tracker: Tracker,
	store: Arc<dyn KeyValueStore>,
	state: AuthState,
}
impl AuthOrchestrator {
	/// Creates an orchestrator in [`AuthState::AwaitingCallback`].
	pub fn new(tracker: Tracker, store: Arc<dyn KeyValueStore>) -> Self {
		Self { tracker, store, state: AuthState::AwaitingCallback }
	}

	/// Creates an orchestrator, starting Authenticated when the store already holds a
	/// complete session.
	pub async fn restore(tracker: Tracker, store: Arc<dyn KeyValueStore>) -> Result<Self> {
		let state = match store::load_session(store.as_ref()).await? {
			Some(stored) => AuthState::Authenticated(stored.into()),
			None => AuthState::AwaitingCallback,
		};

		Ok(Self { tracker, store, state })
	}

	/// Tracker used for provider calls.
	pub fn tracker(&self) -> &Tracker {
		&self.tracker
	}

	/// Current state.
	pub fn state(&self) -> &AuthState {
		&self.state
	}

	/// Authenticated session, if any.
	pub fn session(&self) -> Option<&AuthSession> {
		match &self.state {
			AuthState::Authenticated(session) => Some(session),
			AuthState::AwaitingCallback => None,
		}
	}

	/// Handles the page the host was loaded with.
	///
	/// Without a `code` the orchestrator logs and returns the authorization URL. With one,
	/// it exchanges the code, reads the profile, persists the session under the three
	/// session keys, and becomes Authenticated. Failures never escape: they come back as
	/// [`AuthResult::Failure`] and leave the state untouched. Once Authenticated, the
	/// existing session is returned without any request since codes are single-use.
	pub async fn initialize(&mut self, current_url: &Url) -> CallbackOutcome {
		if let AuthState::Authenticated(session) = &self.state {
			return CallbackOutcome::Completed(AuthResult::Success(session.clone()));
		}

		let Some(code) = authorization_code_from_url(current_url) else {
			let authorize_url = self.tracker.authorization_url();

			#[cfg(feature = "tracing")]
			tracing::info!(%authorize_url, "no authorization code present, redirect to authorize");

			return CallbackOutcome::AwaitingCallback { authorize_url };
		};

		match self.complete(&code).await {
			Ok(session) => {
				#[cfg(feature = "tracing")]
				tracing::info!(athlete_id = session.athlete.id, "athlete authenticated");

				self.state = AuthState::Authenticated(session.clone());

				CallbackOutcome::Completed(AuthResult::Success(session))
			},
			Err(e) => {
				#[cfg(feature = "tracing")]
				tracing::error!(error = %e, "authentication failed");

				CallbackOutcome::Completed(AuthResult::Failure { error: e.to_string() })
			},
		}
	}

	/// Removes the persisted session and returns to [`AuthState::AwaitingCallback`].
	pub async fn sign_out(&mut self) -> Result<()> {
		store::clear_session(self.store.as_ref()).await?;

		self.state = AuthState::AwaitingCallback;

		Ok(())
	}

	async fn complete(&self, code: &str) -> Result<AuthSession> {
		const KIND: FlowKind = FlowKind::Callback;

		obs::observe(KIND, "initialize", async move {
			let tokens = self.tracker.exchange_code(code).await?;
			let athlete = self.tracker.fetch_profile(tokens.access_token.expose()).await?;

			store::persist_session(self.store.as_ref(), &tokens, &athlete).await?;

			Ok(AuthSession { tokens, athlete })
		})
		.await
	}
}
impl Debug for AuthOrchestrator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthOrchestrator")
			.field("tracker", &self.tracker)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
