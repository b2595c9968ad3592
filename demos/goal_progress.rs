//! Walks through the callback flow and prints progress toward the goal.
//!
//! Run once without arguments to get the authorization URL, approve access in a browser,
//! then run again with the full URL the provider redirected to:
//!
//! ```sh
//! cargo run --example goal_progress -- 'https://walker.example.io/debt-walk/?code=...'
//! ```

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use goal_tracker::{
	config::ClientConfig,
	flows::{AuthOrchestrator, AuthResult, CallbackOutcome, Tracker},
	store::{FileStore, KeyValueStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::from_env()?;
	let redirect_uri = config.redirect_uri.clone();
	let store_path =
		env::var("GOAL_TRACKER_STORE").unwrap_or_else(|_| ".goal-tracker/session.json".into());
	let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(store_path)?);
	let mut orchestrator = AuthOrchestrator::restore(Tracker::new(config), store).await?;
	let current_url = match env::args().nth(1) {
		Some(raw) => Url::parse(&raw)?,
		None => redirect_uri,
	};
	let session = match orchestrator.initialize(&current_url).await {
		CallbackOutcome::AwaitingCallback { authorize_url } => {
			println!("Approve access at {authorize_url} and rerun with the redirect URL.");

			return Ok(());
		},
		CallbackOutcome::Completed(AuthResult::Failure { error }) => return Err(eyre!(error)),
		CallbackOutcome::Completed(AuthResult::Success(session)) => session,
	};

	println!("Signed in as {}.", session.athlete.name);

	let stats = orchestrator.tracker().goal_stats(session.tokens.access_token.expose()).await?;

	println!("{}", serde_json::to_string_pretty(&stats)?);

	Ok(())
}
