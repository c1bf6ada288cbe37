//! Service account authentication
//!
//! Signs an RS256 JWT with the service account key and trades it for an OAuth
//! access token at the key's token endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::core::{Result, SnipsheetError};

/// Read/write access to spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Google OAuth token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service account JSON key that signing needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

/// JWT claims for the token exchange
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl ServiceAccountKey {
    /// Parse a service account JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(json).map_err(|e| {
            SnipsheetError::credentials(format!("Invalid service account JSON: {}", e))
        })?;

        if key.client_email.trim().is_empty() {
            return Err(SnipsheetError::credentials("client_email is empty"));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(SnipsheetError::credentials(
                "private_key is not a PEM private key",
            ));
        }

        Ok(key)
    }

    /// Read a service account JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SnipsheetError::with_context(format!("Reading {}", path.display()), e)
        })?;
        Self::from_json(&content)
    }

    /// `GOOGLE_SERVICE_ACCOUNT_JSON` (inline), else the file in `GOOGLE_APPLICATION_CREDENTIALS`
    pub fn from_env() -> Result<Self> {
        if let Ok(json) = env::var("GOOGLE_SERVICE_ACCOUNT_JSON") {
            if !json.trim().is_empty() {
                return Self::from_json(&json);
            }
        }

        if let Ok(path) = env::var("GOOGLE_APPLICATION_CREDENTIALS") {
            if !path.trim().is_empty() {
                return Self::from_file(Path::new(&path));
            }
        }

        Err(SnipsheetError::credentials(
            "Set GOOGLE_SERVICE_ACCOUNT_JSON or GOOGLE_APPLICATION_CREDENTIALS",
        ))
    }

    /// Claims for an assertion issued at `now`
    pub fn claims(&self, now: DateTime<Utc>) -> Claims {
        Claims {
            iss: self.client_email.clone(),
            scope: SPREADSHEETS_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        }
    }

    /// Signed JWT assertion for the token exchange
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            SnipsheetError::credentials(format!("Unusable private_key: {}", e))
        })?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        encode(&header, &self.claims(now), &key).map_err(Into::into)
    }
}

/// Supplies bearer tokens for API calls
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A fixed bearer token
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchanges a service account assertion for an access token, once per process
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    client: reqwest::Client,
    token: OnceCell<String>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey, client: reqwest::Client) -> Self {
        Self {
            key,
            client,
            token: OnceCell::new(),
        }
    }

    async fn exchange(&self) -> Result<String> {
        let assertion = self.key.assertion(Utc::now())?;

        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {}", err.error, desc),
                    None => err.error,
                },
                Err(_) => format!("token endpoint returned {}: {}", status.as_u16(), body),
            };
            return Err(SnipsheetError::auth(message));
        }

        let token: TokenResponse = resp.json().await?;
        debug!(
            client_email = %self.key.client_email,
            expires_in = ?token.expires_in,
            "Obtained access token"
        );
        Ok(token.access_token)
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String> {
        self.token
            .get_or_try_init(|| self.exchange())
            .await
            .map(|t| t.clone())
    }
}
