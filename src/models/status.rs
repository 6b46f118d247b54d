// src/models/status.rs
//
// The JSON shape handed to the dashboard. Field names are part of the public
// contract (camelCase, `isMockData`, `playerList`), so serde renames are pinned
// here rather than left to the consumer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: String,
    pub name: String,
    pub playtime: u64,
}

/// One vehicle currently tracked by GameLabs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAction {
    #[serde(rename = "actionCode")]
    pub action_code: String,
    pub description: String,
    pub context: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLabsVehicles {
    #[serde(default)]
    pub data: Option<Vec<Vehicle>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLabsEvents {
    #[serde(default)]
    pub data: Option<Vec<GameEvent>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLabsActions {
    #[serde(default)]
    pub data: Option<Vec<GameAction>>,
}

/// Optional enrichment bundle. Each field is independently nullable; a failed
/// sub-fetch nulls its field without touching the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLabsBundle {
    pub vehicles: Option<GameLabsVehicles>,
    pub events: Option<GameLabsEvents>,
    pub actions: Option<GameLabsActions>,
    pub available: bool,
}

impl GameLabsBundle {
    pub fn new(
        vehicles: Option<GameLabsVehicles>,
        events: Option<GameLabsEvents>,
        actions: Option<GameLabsActions>,
    ) -> Self {
        let available = vehicles.is_some() || events.is_some() || actions.is_some();
        Self {
            vehicles,
            events,
            actions,
            available,
        }
    }
}

/// The normalized record the dashboard renders. Built fresh on every poll and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatusRecord {
    pub status: ServerStatus,
    pub players: u32,
    pub max_players: u32,
    pub queue: u32,
    pub map: String,
    pub uptime: String,
    pub time: String,
    pub version: String,
    pub player_list: Vec<PlayerEntry>,
    pub ip: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_labs: Option<GameLabsBundle>,
    pub is_mock_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_contract_field_names() {
        let record = ServerStatusRecord {
            status: ServerStatus::Online,
            players: 12,
            max_players: 60,
            queue: 0,
            map: "Chernarus".to_string(),
            uptime: "1h 1m".to_string(),
            time: "08:42".to_string(),
            version: "1".to_string(),
            player_list: vec![PlayerEntry {
                id: "p1".to_string(),
                name: "Alice".to_string(),
                playtime: 120,
            }],
            ip: "205.209.101.156".to_string(),
            port: 2302,
            game_labs: Some(GameLabsBundle::default()),
            is_mock_data: false,
            error: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "online");
        assert_eq!(json["maxPlayers"], 60);
        assert_eq!(json["playerList"][0]["name"], "Alice");
        assert_eq!(json["gameLabs"]["available"], false);
        assert_eq!(json["isMockData"], false);
        // absent error must not serialize as null
        assert!(json.get("error").is_none());
    }

    #[test]
    fn bundle_is_available_when_any_field_is_present() {
        let bundle = GameLabsBundle::new(Some(GameLabsVehicles::default()), None, None);
        assert!(bundle.available);

        let bundle = GameLabsBundle::new(None, None, None);
        assert!(!bundle.available);
    }
}
