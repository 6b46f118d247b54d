use std::env;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;
use governor::Quota;

/// The community servers this service knows about. Anything else in the
/// `server` query parameter is rejected before any upstream traffic happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerId {
    Chernarus,
    Livonia,
}

impl ServerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chernarus => "chernarus",
            Self::Livonia => "livonia",
        }
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chernarus" => Ok(Self::Chernarus),
            "livonia" => Ok(Self::Livonia),
            _ => Err(()),
        }
    }
}

/// Static per-server configuration. The resource id is the CF Tools server id
/// keying every upstream endpoint; without one the server is served mock data.
#[derive(Debug, Clone)]
pub struct ServerIdentity {
    pub id: ServerId,
    pub resource_id: Option<String>,
    pub address: String,
    pub port: u16,
    pub map_name: &'static str,
    pub max_players: u32,
}

#[derive(Clone)]
pub struct Config {
    // CF Tools API access
    pub base_url: String,
    pub application_id: String,
    pub application_secret: String,

    // Outbound request timeout
    pub upstream_timeout_secs: u64,

    // Minimum spacing between GameLabs enrichment attempts
    pub enrichment_min_interval_secs: u64,

    // Rate limiting for the public status endpoint
    pub status_period_secs: u64,
    pub status_burst_limit: u32,

    pub servers: Vec<ServerIdentity>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("CFTOOLS_BASE_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://data.cftools.cloud/v1".to_string()),

            application_id: env::var("CFTOOLS_APPLICATION_ID").unwrap_or_default(),

            application_secret: env::var("CFTOOLS_APPLICATION_SECRET").unwrap_or_default(),

            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            enrichment_min_interval_secs: env::var("ENRICHMENT_MIN_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),

            status_period_secs: env::var("STATUS_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),

            status_burst_limit: env::var("STATUS_BURST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            servers: vec![
                ServerIdentity {
                    id: ServerId::Chernarus,
                    resource_id: non_empty(env::var("CFTOOLS_CHERNARUS_SERVER_ID").ok()),
                    address: "205.209.101.156".to_string(),
                    port: 2302,
                    map_name: "Chernarus",
                    max_players: 60,
                },
                ServerIdentity {
                    id: ServerId::Livonia,
                    resource_id: non_empty(env::var("CFTOOLS_LIVONIA_SERVER_ID").ok()),
                    address: "205.209.101.156".to_string(),
                    port: 2402,
                    map_name: "Livonia",
                    max_players: 60,
                },
            ],
        }
    }

    pub fn identity(&self, id: ServerId) -> Option<&ServerIdentity> {
        self.servers.iter().find(|s| s.id == id)
    }

    pub fn status_quota(&self) -> Quota {
        Quota::with_period(Duration::from_secs(self.status_period_secs))
            .unwrap()
            .allow_burst(NonZeroU32::new(self.status_burst_limit).unwrap())
    }

    pub fn enrichment_quota(&self) -> Quota {
        Quota::with_period(Duration::from_secs(self.enrichment_min_interval_secs))
            .unwrap()
            .allow_burst(NonZeroU32::new(1).unwrap())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
