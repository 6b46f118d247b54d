// src/aggregator.rs
//
// The status aggregation policy: validate happens at the handler, everything
// after that resolves here to a well-formed record. Live data when the
// upstream cooperates, flagged mock data when it does not, and a zeroed
// unknown record when the configuration itself is unusable.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::RateLimiter;
use log::{debug, error, warn};

use crate::cftools::{CfToolsClient, FetchError};
use crate::config::{Config, ServerIdentity};
use crate::mock;
use crate::models::cftools::{PlayerListResponse, ServerInfoResponse};
use crate::models::status::{GameLabsBundle, PlayerEntry, ServerStatus, ServerStatusRecord};
use crate::utils::format_uptime;

type EnrichmentLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub struct StatusAggregator {
    client: CfToolsClient,
    // Spaces out GameLabs fetches: at most one attempt per configured
    // interval, shared across all servers and requests.
    enrichment_limiter: EnrichmentLimiter,
}

impl StatusAggregator {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: CfToolsClient::new(config)?,
            enrichment_limiter: RateLimiter::direct(config.enrichment_quota()),
        })
    }

    /// Produces a record for a known server. Never fails: every upstream
    /// failure path resolves to a flagged fallback record.
    pub async fn status(&self, identity: &ServerIdentity) -> ServerStatusRecord {
        let resource_id = match &identity.resource_id {
            Some(id) => id,
            None => {
                warn!(
                    "CF Tools server id not configured for {}, returning mock data",
                    identity.id
                );
                return mock::mock_record(identity);
            }
        };

        match self.live_status(identity, resource_id).await {
            Ok(record) => record,
            Err(FetchError::InvalidUrl(e)) => {
                error!("Cannot build CF Tools endpoint for {}: {}", identity.id, e);
                mock::unknown_record(identity)
            }
            Err(e) => {
                warn!(
                    "CF Tools API failed for {}, falling back to mock data: {}",
                    identity.id, e
                );
                mock::degraded_record(identity)
            }
        }
    }

    async fn live_status(
        &self,
        identity: &ServerIdentity,
        resource_id: &str,
    ) -> Result<ServerStatusRecord, FetchError> {
        debug!("Attempting to fetch CF Tools data for {}", identity.id);
        let token = self.client.token().await?;

        // Both primary fetches must succeed; there is no partial status.
        let (info, players) = tokio::join!(
            self.client.server_info(&token, resource_id),
            self.client.player_list(&token, resource_id),
        );
        let info = info?;
        let players = players?;

        let game_labs = if self.enrichment_limiter.check().is_ok() {
            self.fetch_enrichment(&token, resource_id).await
        } else {
            debug!(
                "Skipping GameLabs fetch for {} (minimum interval not elapsed)",
                identity.id
            );
            GameLabsBundle::default()
        };

        Ok(build_record(identity, &info, &players, game_labs))
    }

    async fn fetch_enrichment(&self, token: &str, resource_id: &str) -> GameLabsBundle {
        debug!("Attempting to fetch GameLabs data");
        let (vehicles, events, actions) = tokio::join!(
            self.client.vehicles(token, resource_id),
            self.client.events(token, resource_id),
            self.client.actions(token, resource_id),
        );
        GameLabsBundle::new(vehicles, events, actions)
    }
}

fn build_record(
    identity: &ServerIdentity,
    info: &ServerInfoResponse,
    players: &PlayerListResponse,
    game_labs: GameLabsBundle,
) -> ServerStatusRecord {
    let gameserver = info.server.as_ref().and_then(|s| s.gameserver.as_ref());
    let integration = gameserver.and_then(|g| g.game_integration.as_ref());
    let runtime = gameserver.and_then(|g| g.runtime.as_ref());

    // Online requires both the worker-level flag and the in-game integration
    // flag; any other combination reads as offline.
    let status = if info.status && integration.map_or(false, |i| i.status) {
        ServerStatus::Online
    } else {
        ServerStatus::Offline
    };

    let player_list = players
        .sessions
        .iter()
        .take(10)
        .map(|session| PlayerEntry {
            id: session.player_id.clone(),
            name: session
                .player_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            playtime: session.playtime.unwrap_or(0),
        })
        .collect();

    ServerStatusRecord {
        status,
        players: players.sessions.len() as u32,
        max_players: identity.max_players,
        queue: 0,
        map: identity.map_name.to_string(),
        uptime: format_uptime(runtime.map_or(0, |r| r.uptime)),
        time: runtime
            .and_then(|r| r.gametime.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        version: integration
            .and_then(|i| i.version)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
        player_list,
        ip: identity.address.clone(),
        port: identity.port,
        game_labs: Some(game_labs),
        is_mock_data: false,
        error: None,
    }
}
