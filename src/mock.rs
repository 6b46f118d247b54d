// src/mock.rs
//
// Synthetic status records for the two situations where live data is out of
// reach: no CF Tools server id configured, or the upstream fetch failed.
// Values are plausible rather than faithful; the record is always flagged.

use lazy_static::lazy_static;
use rand::Rng;
use uuid::Uuid;

use crate::config::ServerIdentity;
use crate::models::status::{PlayerEntry, ServerStatus, ServerStatusRecord};

pub const FALLBACK_VERSION: &str = "1.25.159490";

lazy_static! {
    static ref SURVIVOR_NAMES: Vec<&'static str> = vec![
        "Survivor_Alpha",
        "Survivor_Bravo",
        "Survivor_Charlie",
        "Survivor_Delta",
        "Survivor_Echo",
    ];
}

/// Plausible random record for an unconfigured server. No error message: the
/// operator opted out of live data, nothing failed.
pub fn mock_record(identity: &ServerIdentity) -> ServerStatusRecord {
    let mut rng = rand::thread_rng();

    let player_list = SURVIVOR_NAMES
        .iter()
        .map(|name| PlayerEntry {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            playtime: rng.gen_range(50..600),
        })
        .collect();

    ServerStatusRecord {
        status: ServerStatus::Online,
        players: rng.gen_range(5..50),
        max_players: identity.max_players,
        queue: 0,
        map: identity.map_name.to_string(),
        uptime: format!("{}h {}m", rng.gen_range(0..72), rng.gen_range(0..60)),
        time: if rng.gen_bool(0.5) { "Day" } else { "Night" }.to_string(),
        version: FALLBACK_VERSION.to_string(),
        player_list,
        ip: identity.address.clone(),
        port: identity.port,
        game_labs: None,
        is_mock_data: true,
        error: None,
    }
}

/// Same generator, but carrying the message shown when a live fetch failed.
pub fn degraded_record(identity: &ServerIdentity) -> ServerStatusRecord {
    let mut record = mock_record(identity);
    record.error = Some("Using mock data - CF Tools API configuration needed".to_string());
    record
}

/// Last-resort record when not even an endpoint URL could be built. Zeroed
/// counters, unknown status, nothing synthesized.
pub fn unknown_record(identity: &ServerIdentity) -> ServerStatusRecord {
    ServerStatusRecord {
        status: ServerStatus::Unknown,
        players: 0,
        max_players: identity.max_players,
        queue: 0,
        map: identity.map_name.to_string(),
        uptime: "Unknown".to_string(),
        time: "Unknown".to_string(),
        version: "Unknown".to_string(),
        player_list: Vec::new(),
        ip: identity.address.clone(),
        port: identity.port,
        game_labs: None,
        is_mock_data: true,
        error: Some("Failed to fetch live data".to_string()),
    }
}
