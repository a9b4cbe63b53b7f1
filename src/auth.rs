use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use tracing::{debug, info};

use crate::error::{Result, SyncError};

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// OAuth scope granting read/write access to calendars and events
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Token endpoint used when the key file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const WEBHOOK_TAG_KEY: &[u8] = b"x-webhook-source";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The subset of a Google service-account key file we need to mint tokens
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

impl ServiceAccountKey {
    /// Parse a service-account key from its JSON form.
    ///
    /// Keys pasted into environment variables often carry literal `\n`
    /// sequences instead of newlines; those are restored so the PEM parses.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut key: ServiceAccountKey = serde_json::from_str(raw)
            .map_err(|e| SyncError::Config(format!("invalid service account JSON: {}", e)))?;
        key.private_key = key.private_key.replace("\\n", "\n");
        Ok(key)
    }
}

/// Claims of the JWT bearer assertion sent to the token endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Build the RS256-signed assertion for the service account at time `now`.
pub fn build_assertion(key: &ServiceAccountKey, now: i64) -> Result<String> {
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: CALENDAR_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &encoding_key)?)
}

/// Exchange a freshly signed assertion for an access token.
pub async fn fetch_access_token(http: &Client, key: &ServiceAccountKey) -> Result<String> {
    let assertion = build_assertion(key, Utc::now().timestamp())?;

    info!("Requesting access token for {}", key.client_email);
    debug!("Token endpoint: {}", key.token_uri);

    let res = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(SyncError::Auth(format!(
            "token endpoint returned {}: {}",
            status, body
        )));
    }

    let token = res.json::<TokenResponse>().await?;
    debug!("Access token issued, expires in {:?}s", token.expires_in);
    Ok(token.access_token)
}

/// Check the `x-webhook-source` header against the configured secret.
///
/// Both values are run through HMAC-SHA256 and the tags compared with
/// `verify_slice`, which does not short-circuit on the first differing byte.
pub fn verify_webhook_source(provided: Option<&str>, expected: &str) -> bool {
    let Some(provided) = provided else {
        return false;
    };

    let tag = |value: &str| {
        let mut mac = HmacSha256::new_from_slice(WEBHOOK_TAG_KEY)
            .expect("HMAC can take key of any size");
        mac.update(value.as_bytes());
        mac
    };

    let expected_tag = tag(expected).finalize().into_bytes();
    tag(provided).verify_slice(&expected_tag).is_ok()
}
