//! OAuth2 client-credentials authentication for the Amadeus API.
//!
//! Tokens are requested from `/v1/security/oauth2/token` and reused until
//! shortly before `expires_in` elapses.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use common::Error;

use crate::rate_limit::RateLimiter;

const TOKEN_PATH: &str = "/v1/security/oauth2/token";

/// Refresh this long before the provider-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn from_response(resp: TokenResponse, now: Instant) -> Self {
        let lifetime = Duration::from_secs(resp.expires_in).saturating_sub(EXPIRY_MARGIN);
        Self {
            value: resp.access_token,
            expires_at: now + lifetime,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Holds API credentials and the cached access token.
#[derive(Clone)]
pub struct AmadeusAuth {
    pub client_id: String,
    client_secret: String,
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl std::fmt::Debug for AmadeusAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmadeusAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl AmadeusAuth {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.trim().to_string(),
            client_secret: client_secret.trim().to_string(),
            token: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a valid bearer token, fetching a new one if needed.
    ///
    /// A fetch takes a slot from `limiter` like any other provider call.
    pub async fn bearer_token(
        &self,
        http: &reqwest::Client,
        base_url: &str,
        limiter: &RateLimiter,
    ) -> Result<String, Error> {
        let mut guard = self.token.lock().await;

        if let Some(token) = guard.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
            debug!("Amadeus access token expired, refreshing");
        }

        limiter.wait().await;
        let resp = self.request_token(http, base_url).await?;
        let token = AccessToken::from_response(resp, Instant::now());
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        *self.token.lock().await = None;
    }

    async fn request_token(
        &self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<TokenResponse, Error> {
        let url = format!("{}{}", base_url, TOKEN_PATH);
        debug!("Requesting Amadeus access token: {}", url);

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let resp = http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("token request failed: {e}")))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(500).collect();
            return Err(Error::Auth(format!(
                "token endpoint returned {}: {}",
                status, snippet
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::Auth(format!("token JSON parse error: {e}")))
    }
}
