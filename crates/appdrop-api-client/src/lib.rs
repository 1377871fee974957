//! HTTP client for the MDM application API.
//!
//! Every request carries the tenant key header and Basic credentials from the
//! session. Generic GET/POST helpers live here; endpoint methods are in `api`,
//! and the two transfer engines plus the creation invoker build on them.

pub mod api;
pub mod chunked;
pub mod create;
pub mod link;

use anyhow::{Context, Result};
use appdrop_core::models::ApiErrorBody;
use appdrop_core::{Credentials, IngestError, SessionContext};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// Header carrying the tenant API key.
pub const TENANT_HEADER: &str = "aw-tenant-code";

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// 401/403: the credentials or tenant key were refused.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }

    /// The server could not be reached or the exchange broke off, including
    /// a connection lost while the response body was being read.
    pub fn is_connectivity(&self) -> bool {
        match self {
            ApiError::Request { source, .. } => {
                source.is_connect()
                    || source.is_timeout()
                    || source.is_request()
                    || source.is_body()
                    || source.is_decode()
            }
            _ => false,
        }
    }

    /// Failures that invalidate the whole session rather than one descriptor.
    pub fn is_session_failure(&self) -> bool {
        self.is_auth_failure() || self.is_connectivity()
    }

    /// Server-provided message for status errors, the error text otherwise.
    pub fn server_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Maps a search failure: session failures become fatal.
    pub fn into_search_error(self) -> IngestError {
        if self.is_session_failure() {
            IngestError::Session(self.to_string())
        } else {
            IngestError::Search(self.to_string())
        }
    }
}

/// HTTP client bound to one server and one set of credentials.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    encoded_credentials: String,
}

impl ApiClient {
    /// No client-side timeout is configured; large chunk uploads rely on the
    /// platform defaults.
    pub fn new(base_url: &str, api_key: &str, credentials: &Credentials) -> Result<Self> {
        Self::with_encoded_credentials(base_url, api_key, &credentials.encoded())
    }

    pub fn from_session(session: &SessionContext) -> Result<Self> {
        Self::with_encoded_credentials(
            session.server_url(),
            session.api_key(),
            session.encoded_credentials(),
        )
    }

    fn with_encoded_credentials(
        base_url: &str,
        api_key: &str,
        encoded_credentials: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("appdrop/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            encoded_credentials: encoded_credentials.to_string(),
        })
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(TENANT_HEADER, self.api_key.as_str())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.encoded_credentials),
            )
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Sends an authenticated request. Returns the body, or `None` for an
    /// empty/204 answer.
    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<Option<String>, ApiError> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                ApiErrorBody::message_from(&body)
            };
            return Err(ApiError::Status { status, message });
        }

        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }

    fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// GET with query parameters. An empty answer yields `T::default()`.
    pub async fn get<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        match self.execute(request, &url).await? {
            Some(body) => Self::decode(&url, &body),
            None => Ok(T::default()),
        }
    }

    /// POST a JSON body and deserialize the response.
    pub async fn post_json<T: DeserializeOwned + Default, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);

        match self.execute(request, &url).await? {
            Some(body) => Self::decode(&url, &body),
            None => Ok(T::default()),
        }
    }

    /// POST without a body; all parameters travel in the query string.
    pub async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let request = self
            .client
            .post(&url)
            .query(query)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("");

        let body = self.execute(request, &url).await?.unwrap_or_default();
        Self::decode(&url, &body)
    }

    /// Raw client for requests that must not carry MDM credentials.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
