//! Crate-level error types shared across flows, configuration, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Authorization code could not be exchanged for tokens.
	#[error("Failed to get access token: {0}")]
	Auth(#[source] RequestError),
	/// Activity pagination failed; no partial results are returned.
	#[error("Failed to fetch activities: {0}")]
	Fetch(#[source] RequestError),
	/// Authenticated athlete profile could not be retrieved.
	#[error("Failed to fetch athlete profile: {0}")]
	Profile(#[source] RequestError),
}
impl Error {
	/// Returns the underlying request failure for provider-facing errors.
	pub fn request_error(&self) -> Option<&RequestError> {
		match self {
			Self::Auth(e) | Self::Fetch(e) | Self::Profile(e) => Some(e),
			_ => None,
		}
	}

	/// HTTP status code returned by the provider, when the failure carried one.
	pub fn status(&self) -> Option<u16> {
		match self.request_error()? {
			RequestError::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Failure of a single provider request.
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// Provider answered with a non-success status.
	#[error("{status_text}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase for the status (e.g. `Unauthorized`).
		status_text: String,
	},
	/// Network-level failure underneath the request.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Successful response whose JSON body could not be decoded.
	#[error("Provider returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Request input or response payload is missing a required field.
	#[error("Missing required field `{field}`.")]
	MissingField {
		/// Field name.
		field: &'static str,
	},
	/// Provider returned a response the client could not interpret.
	#[error("Provider returned an unexpected response: {message}.")]
	Unexpected {
		/// Summary of the unexpected response.
		message: String,
	},
}
impl RequestError {
	/// Builds a status error using the canonical reason phrase for `status`.
	pub fn from_status(status: u16) -> Self {
		let status_text = reqwest::StatusCode::from_u16(status)
			.ok()
			.and_then(|code| code.canonical_reason())
			.map(str::to_owned)
			.unwrap_or_else(|| format!("HTTP {status}"));

		Self::Status { status, status_text }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// An endpoint URL cannot be parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint must use HTTPS (loopback hosts excepted).
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The API base URL cannot carry path segments.
	#[error("The API base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},

	/// Client identifier was not supplied.
	#[error("Client identifier is required.")]
	MissingClientId,
	/// Client secret was not supplied.
	#[error("Client secret is required.")]
	MissingClientSecret,
	/// Redirect URI was not supplied.
	#[error("Redirect URI is required.")]
	MissingRedirectUri,
	/// Goal distance is negative or not finite.
	#[error("Goal distance must be a finite, non-negative number of miles: {value}.")]
	InvalidGoal {
		/// Rejected goal value.
		value: f64,
	},
	/// Target activity name is empty.
	#[error("Target activity name cannot be empty.")]
	EmptyActivityName,
	/// Page size is outside what the provider accepts.
	#[error("Page size must be between 1 and {max}: {value}.")]
	InvalidPageSize {
		/// Rejected page size.
		value: u32,
		/// Largest accepted page size.
		max: u32,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Required environment variable is absent.
	#[error("Environment variable `{0}` is missing.")]
	MissingVar(&'static str),
	/// Environment variable holds an unusable value.
	#[error("Environment variable `{var}` is invalid: {reason}.")]
	InvalidVar {
		/// Variable name.
		var: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
