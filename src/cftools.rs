// src/cftools.rs
//
// CF Tools Data API client: bearer token exchange with a process-wide cache,
// authorized JSON fetches for the primary status data, and never-failing
// fetches for the optional GameLabs data.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::cftools::{AuthResponse, PlayerListResponse, ServerInfoResponse};
use crate::models::status::{GameLabsActions, GameLabsEvents, GameLabsVehicles};

// CF Tools issues tokens valid for 24 hours; cache for one hour less so a
// token handed out near the end of the window is still accepted upstream.
const TOKEN_VALIDITY: Duration = Duration::from_secs(23 * 60 * 60);

#[derive(Debug)]
pub enum FetchError {
    /// The credential exchange was refused or returned an unusable payload.
    Auth(String),
    /// A data endpoint answered with a non-success status.
    Upstream { endpoint: String, status: u16 },
    /// The request never completed (connect, timeout, decode).
    Transport(reqwest::Error),
    /// The configured base URL cannot form a valid endpoint.
    InvalidUrl(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(msg) => write!(f, "CF Tools auth error: {}", msg),
            Self::Upstream { endpoint, status } => {
                write!(f, "CF Tools API error: {} returned {}", endpoint, status)
            }
            Self::Transport(e) => write!(f, "CF Tools request failed: {}", e),
            Self::InvalidUrl(msg) => write!(f, "Invalid CF Tools endpoint: {}", msg),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Single-slot bearer token cache. Shared by every in-flight request;
/// concurrent refreshes during the expiry window are tolerated because the
/// exchange is idempotent and cheap next to the polling cadence.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token unless it is absent or past its expiry.
    pub fn get(&self) -> Option<String> {
        self.slot
            .read()
            .as_ref()
            .filter(|t| t.expires_at > Instant::now())
            .map(|t| t.token.clone())
    }

    pub fn store(&self, token: String, validity: Duration) {
        *self.slot.write() = Some(CachedToken {
            token,
            expires_at: Instant::now() + validity,
        });
    }
}

pub struct CfToolsClient {
    http: reqwest::Client,
    base_url: String,
    application_id: String,
    application_secret: String,
    tokens: TokenCache,
}

impl CfToolsClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            application_id: config.application_id.clone(),
            application_secret: config.application_secret.clone(),
            tokens: TokenCache::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// Returns a valid bearer token, exchanging credentials only when the
    /// cached one is absent or expired.
    pub async fn token(&self) -> Result<String, FetchError> {
        if let Some(token) = self.tokens.get() {
            return Ok(token);
        }

        debug!("Authenticating with CF Tools API");
        let url = self.endpoint("/auth/register")?;
        let response = self
            .http
            .post(url)
            .header("User-Agent", &self.application_id)
            .json(&serde_json::json!({
                "application_id": self.application_id,
                "secret": self.application_secret,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("CF Tools authentication error: {} {}", status, body);
            return Err(FetchError::Auth(format!("auth returned {}", status)));
        }

        let auth: AuthResponse = response.json().await?;
        self.tokens.store(auth.token.clone(), TOKEN_VALIDITY);
        info!("CF Tools authentication successful");
        Ok(auth.token)
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;

        debug!("Fetching CF Tools data from {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .header("User-Agent", &self.application_id)
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("CF Tools API error response from {}: {} {}", path, status, body);
            return Err(FetchError::Upstream {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    pub async fn server_info(
        &self,
        token: &str,
        resource_id: &str,
    ) -> Result<ServerInfoResponse, FetchError> {
        self.get_json(token, &format!("/server/{}/info", resource_id))
            .await
    }

    pub async fn player_list(
        &self,
        token: &str,
        resource_id: &str,
    ) -> Result<PlayerListResponse, FetchError> {
        self.get_json(token, &format!("/server/{}/GSM/list", resource_id))
            .await
    }

    /// GameLabs fetches are enrichment only: any failure is logged and
    /// absorbed to `None` instead of reaching the caller.
    async fn get_optional<T: DeserializeOwned>(&self, token: &str, path: &str) -> Option<T> {
        match self.get_json(token, path).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("GameLabs data fetch failed for {}: {}", path, e);
                None
            }
        }
    }

    pub async fn vehicles(&self, token: &str, resource_id: &str) -> Option<GameLabsVehicles> {
        self.get_optional(token, &format!("/server/{}/GameLabs/entities/vehicles", resource_id))
            .await
    }

    pub async fn events(&self, token: &str, resource_id: &str) -> Option<GameLabsEvents> {
        self.get_optional(token, &format!("/server/{}/GameLabs/entities/events", resource_id))
            .await
    }

    pub async fn actions(&self, token: &str, resource_id: &str) -> Option<GameLabsActions> {
        self.get_optional(token, &format!("/server/{}/GameLabs/actions", resource_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cache_returns_unexpired_tokens() {
        let cache = TokenCache::new();
        assert_eq!(cache.get(), None);

        cache.store("abc".to_string(), Duration::from_secs(3600));
        assert_eq!(cache.get(), Some("abc".to_string()));
    }

    #[test]
    fn token_cache_expires() {
        let cache = TokenCache::new();
        cache.store("abc".to_string(), Duration::ZERO);
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn token_cache_keeps_latest_store() {
        let cache = TokenCache::new();
        cache.store("old".to_string(), Duration::from_secs(3600));
        cache.store("new".to_string(), Duration::from_secs(3600));
        assert_eq!(cache.get(), Some("new".to_string()));
    }
}
