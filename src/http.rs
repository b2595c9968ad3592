//! Transport primitives for token exchanges and bearer-authenticated API reads.
//!
//! [`ReqwestHttpClient`] is the only HTTP dependency of the crate. Token exchanges go
//! through the `oauth2` crate, which drives an [`InstrumentedHandle`] that records the
//! response status in a [`ResponseMetadataSlot`] so failures can be reported with the
//! provider's status text even when the error body is not OAuth-shaped. API reads use
//! [`ReqwestHttpClient::get_json`] directly.

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{RequestError, TransportError},
};

/// Captures metadata from the most recent HTTP response for downstream error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint, if available.
	pub status: Option<u16>,
}
impl ResponseMetadata {
	/// Returns true when a status was recorded and it is outside the 2xx range.
	pub fn is_failure(&self) -> bool {
		self.status.is_some_and(|status| !(200..300).contains(&status))
	}
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
///
/// A fresh slot is created for each token request and read immediately after `oauth2`
/// resolves.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds an instrumented handle that captures response metadata into `slot`.
	pub fn with_metadata(&self, slot: ResponseMetadataSlot) -> InstrumentedHandle {
		InstrumentedHandle::new(self.0.clone(), slot)
	}

	/// Issues a bearer-authenticated GET and decodes the JSON body.
	///
	/// Non-success statuses become [`RequestError::Status`] carrying the canonical reason
	/// phrase; the body is not read in that case.
	pub async fn get_json<T>(
		&self,
		url: Url,
		access_token: &str,
		query: &[(&str, String)],
	) -> Result<T, RequestError>
	where
		T: DeserializeOwned,
	{
		let response = self
			.0
			.get(url)
			.bearer_auth(access_token)
			.header(ACCEPT, HeaderValue::from_static("application/json"))
			.query(query)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();

		if !status.is_success() {
			return Err(RequestError::from_status(status.as_u16()));
		}

		let bytes = response.bytes().await.map_err(TransportError::from)?;

		decode_json(&bytes)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}

/// Instrumented adapter that implements [`AsyncHttpClient`] for reqwest.
struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}

/// Handle returned by [`ReqwestHttpClient::with_metadata`].
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
impl InstrumentedHandle {
	fn new(client: ReqwestClient, slot: ResponseMetadataSlot) -> Self {
		Self(Arc::new(InstrumentedHttpClient { client, slot }))
	}
}
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			client.slot.store(ResponseMetadata { status: Some(status.as_u16()) });

			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Decodes a JSON payload, keeping the path of the first offending field.
pub(crate) fn decode_json<T>(bytes: &[u8]) -> Result<T, RequestError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| RequestError::Decode { source })
}

/// Decodes an already-parsed JSON value, keeping the failing path in the error.
pub(crate) fn decode_value<T>(value: serde_json::Value) -> Result<T, RequestError>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value).map_err(|source| RequestError::Decode { source })
}
