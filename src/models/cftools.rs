// src/models/cftools.rs
//
// Serde mirrors of the CF Tools Data API payloads, limited to the fields the
// aggregator actually reads. Everything below the top-level status flag is
// optional: a partially populated payload downgrades the derived fields, it
// does not fail the fetch.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// `GET /server/{id}/info`
#[derive(Debug, Deserialize)]
pub struct ServerInfoResponse {
    #[serde(default)]
    pub status: bool,
    pub server: Option<ServerObject>,
}

#[derive(Debug, Deserialize)]
pub struct ServerObject {
    pub gameserver: Option<GameServer>,
}

#[derive(Debug, Deserialize)]
pub struct GameServer {
    pub game_integration: Option<GameIntegration>,
    pub runtime: Option<GameRuntime>,
}

#[derive(Debug, Deserialize)]
pub struct GameIntegration {
    #[serde(default)]
    pub status: bool,
    pub version: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GameRuntime {
    pub gametime: Option<String>,
    #[serde(default)]
    pub uptime: u64,
}

/// `GET /server/{id}/GSM/list`
#[derive(Debug, Deserialize)]
pub struct PlayerListResponse {
    #[serde(default)]
    pub sessions: Vec<PlayerSession>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerSession {
    #[serde(default)]
    pub player_id: String,
    pub player_name: Option<String>,
    pub playtime: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_payload_tolerates_missing_branches() {
        let info: ServerInfoResponse = serde_json::from_str(r#"{"status": true}"#).unwrap();
        assert!(info.status);
        assert!(info.server.is_none());

        let info: ServerInfoResponse = serde_json::from_str(
            r#"{
                "status": true,
                "server": {
                    "gameserver": {
                        "game_integration": {"status": true, "version": 1},
                        "runtime": {"gametime": "08:42", "uptime": 3661}
                    }
                }
            }"#,
        )
        .unwrap();
        let gameserver = info.server.unwrap().gameserver.unwrap();
        assert_eq!(gameserver.runtime.unwrap().uptime, 3661);
        assert_eq!(gameserver.game_integration.unwrap().version, Some(1));
    }

    #[test]
    fn session_list_defaults_to_empty() {
        let list: PlayerListResponse = serde_json::from_str(r#"{"status": true}"#).unwrap();
        assert!(list.sessions.is_empty());
    }
}
