//! REST API client
//!
//! Handles communication with the remote backend: the auth endpoints and
//! the per-kind record collections. All response shapes are normalized
//! here; nothing past this module ever sees a raw HTTP body.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{Session, Transaction, TransactionKind, TransactionPatch, User};

// =============================================================================
// API response models
// =============================================================================

/// Password-grant token response
///
/// Everything is optional on purpose: a 2xx body missing either the access
/// token or the user is still a failed sign-in.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: Option<User>,
}

/// A record as stored in the income/expanse collections
///
/// The collection implies the kind, so the wire record does not carry one.
#[derive(Debug, Clone, Deserialize)]
struct WireRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(deserialize_with = "deserialize_amount")]
    amount: Decimal,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    date: chrono::DateTime<chrono::Utc>,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Payload for creating a record; `userId` and `created_at` are stamped by
/// the transaction store, the server assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct NewRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Deserialize ID that can be number or string
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::String(s) => Ok(s),
        _ => Err(D::Error::custom("expected number or string for id")),
    }
}

/// Deserialize amount that can be number or string
///
/// A non-numeric amount fails the record here, at the wire boundary, so
/// the aggregate queries never see anything that is not a Decimal.
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => {
            let s = n.to_string();
            s.parse::<Decimal>()
                .map_err(|e| D::Error::custom(format!("invalid decimal: {}", e)))
        }
        JsonValue::String(s) => s
            .parse::<Decimal>()
            .map_err(|e| D::Error::custom(format!("invalid decimal: {}", e))),
        _ => Err(D::Error::custom("expected number or string for amount")),
    }
}

// =============================================================================
// API client
// =============================================================================

/// Client for the fixed remote REST surface
///
/// Every request carries the project api key; the bearer `Authorization`
/// header is attached only when the caller supplies a token. Deployments
/// with row-level security disabled simply never supply one for the record
/// collections (`send_authorization` in the config).
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a new client for the given base URL and api key
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|_| Error::Config(format!("Invalid API base URL: {}", base_url)))?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(Error::Config(format!(
                "API base URL must be http(s): {}",
                base_url
            )));
        }
        if api_key.is_empty() {
            return Err(Error::Config("API key cannot be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Collection path for a transaction kind
    ///
    /// The remote expense collection really is spelled "expanse".
    fn collection(kind: TransactionKind) -> &'static str {
        match kind {
            TransactionKind::Income => "/income",
            TransactionKind::Expense => "/expanse",
        }
    }

    /// Single header-construction policy for every request
    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Prefer", "return=minimal");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request, mapping transport failures to user-facing messages
    fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().map_err(|e| self.map_request_error(e))
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Network("Connection timed out after 30 seconds".to_string())
        } else if error.is_connect() {
            Error::Network("Unable to connect to the server".to_string())
        } else {
            Error::Network(format!("Request failed: {}", error))
        }
    }

    /// Normalize a non-2xx response into a single remote error
    ///
    /// The backend is not consistent about its error shape:
    /// `{"error":{"message":..}}`, `{"msg":..}`, `{"error_description":..}`
    /// and plain text all occur. Collapse them here.
    fn error_from_response(response: Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();

        let message = serde_json::from_str::<JsonValue>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
                    .or_else(|| v.get("msg").and_then(|m| m.as_str()).map(str::to_string))
                    .or_else(|| {
                        v.get("error_description")
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                    })
                    .or_else(|| v.get("error").and_then(|m| m.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "An error occurred".to_string()
                } else {
                    body
                }
            });

        Error::remote(status, message)
    }

    /// Check a response, consuming it into a remote error when non-2xx
    fn ensure_success(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response))
        }
    }

    // =========================================================================
    // Auth endpoints
    // =========================================================================

    /// Register a new account; returns the raw response body untouched
    pub fn sign_up(&self, email: &str, password: &str) -> Result<JsonValue> {
        let url = format!("{}/auth/signup", self.base_url);
        debug!(email, "signup request");

        let response = self.send(
            self.request(Method::POST, &url, None)
                .json(&serde_json::json!({ "email": email, "password": password })),
        )?;
        let response = Self::ensure_success(response)?;

        response
            .json()
            .map_err(|e| Error::Network(format!("Failed to parse signup response: {}", e)))
    }

    /// Exchange email/password for a session and user
    ///
    /// A 2xx body missing either token or user is treated as a failure.
    pub fn password_grant(&self, email: &str, password: &str) -> Result<(Session, User)> {
        let url = format!("{}/auth/token?grant_type=password", self.base_url);
        debug!(email, "password grant request");

        let response = self.send(
            self.request(Method::POST, &url, None)
                .json(&serde_json::json!({ "email": email, "password": password })),
        )?;
        let status = response.status().as_u16();
        let response = Self::ensure_success(response)?;

        let body: TokenResponse = response
            .json()
            .map_err(|e| Error::Network(format!("Failed to parse token response: {}", e)))?;

        match (body.access_token, body.user) {
            (Some(access_token), Some(user)) if !access_token.is_empty() => {
                let session = Session::new(
                    access_token,
                    body.refresh_token.unwrap_or_default(),
                    body.expires_at.unwrap_or_default(),
                );
                Ok((session, user))
            }
            _ => {
                warn!(status, "token response missing access_token or user");
                Err(Error::remote(status, "Invalid response from server"))
            }
        }
    }

    /// Invalidate the session server-side; callers treat failure as advisory
    pub fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/auth/logout", self.base_url);
        debug!("logout request");

        let response = self.send(self.request(Method::POST, &url, Some(access_token)))?;
        Self::ensure_success(response)?;
        Ok(())
    }

    /// Fetch the user the access token belongs to
    pub fn get_user(&self, access_token: &str) -> Result<User> {
        let url = format!("{}/auth/user", self.base_url);
        debug!("get user request");

        let response = self.send(self.request(Method::GET, &url, Some(access_token)))?;
        let response = Self::ensure_success(response)?;

        response
            .json()
            .map_err(|e| Error::Network(format!("Failed to parse user response: {}", e)))
    }

    // =========================================================================
    // Record collections
    // =========================================================================

    /// List one kind of record for a user, newest first
    pub fn list_records(
        &self,
        kind: TransactionKind,
        user_id: &str,
        token: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let url = format!(
            "{}{}?userId=eq.{}&order=created_at.desc",
            self.base_url,
            Self::collection(kind),
            user_id
        );
        debug!(%kind, user_id, "list records");

        let response = self.send(self.request(Method::GET, &url, token))?;
        let response = Self::ensure_success(response)?;

        let records: Vec<WireRecord> = response
            .json()
            .map_err(|e| Error::Network(format!("Failed to parse {} records: {}", kind, e)))?;

        Ok(records
            .into_iter()
            .map(|r| Transaction {
                id: r.id,
                user_id: r.user_id,
                kind,
                amount: r.amount,
                description: r.description,
                category: r.category,
                date: r.date,
                created_at: r.created_at,
            })
            .collect())
    }

    /// Create a record in the kind's collection
    pub fn create_record(
        &self,
        kind: TransactionKind,
        record: &NewRecord,
        token: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}{}", self.base_url, Self::collection(kind));
        debug!(%kind, "create record");

        let response = self.send(self.request(Method::POST, &url, token).json(record))?;
        Self::ensure_success(response)?;
        Ok(())
    }

    /// Patch the supplied fields of one record
    pub fn update_record(
        &self,
        kind: TransactionKind,
        id: &str,
        patch: &TransactionPatch,
        token: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}{}?id=eq.{}", self.base_url, Self::collection(kind), id);
        debug!(%kind, id, "update record");

        let response = self.send(self.request(Method::PATCH, &url, token).json(patch))?;
        Self::ensure_success(response)?;
        Ok(())
    }

    /// Delete one record
    pub fn delete_record(
        &self,
        kind: TransactionKind,
        id: &str,
        token: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}{}?id=eq.{}", self.base_url, Self::collection(kind), id);
        debug!(%kind, id, "delete record");

        let response = self.send(self.request(Method::DELETE, &url, token))?;
        Self::ensure_success(response)?;
        Ok(())
    }
}
