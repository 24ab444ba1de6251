//! On-disk JSON schemas, 1-to-1 with the project directory format.
//!
//! Struct field order fixes the key order written by the save path; serde's
//! missing-field errors are what `MalformedRecord` wraps on the load path.
//! Script *text* never appears in these records: tiles reference a sidecar
//! file under `scripts/` and the writer/parser move the text in and out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{MISSING_IMAGE, Tile, script_path};

/// `manifest.json` at the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    pub spawn: SpawnRecord,
    /// room name → path of the room file, relative to the project root.
    pub rooms: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub room_name: String,
    pub x_loc: i32,
    pub y_loc: i32,
}

/// `rooms/<name>.json`: the tileset keyed by layout symbol, plus the encoded
/// layout (one symbol per cell, one line per row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRecord {
    pub tileset: BTreeMap<char, TileRecord>,
    pub layout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileRecord {
    pub name: String,
    pub display_name: String,
    pub passable: bool,
    pub seethrough: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<EventsRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsRecord {
    /// Path of the script file, relative to the room file's directory.
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interact: Option<String>,
}

impl TileRecord {
    pub fn from_tile(tile: &Tile) -> Self {
        let events = if tile.script.is_empty() {
            None
        } else {
            Some(EventsRecord {
                script: script_path(&tile.name),
                step: non_empty(&tile.step_func),
                interact: non_empty(&tile.interact_func),
            })
        };
        Self {
            name: tile.name.clone(),
            display_name: tile.display_name.clone(),
            passable: tile.passable,
            seethrough: tile.seethrough,
            image_path: Some(tile.image_path.clone()),
            events,
        }
    }

    /// Inverse of `from_tile`, except the script text which comes from the
    /// referenced file (`script` is filled in by the caller).
    pub fn into_tile(self, script: String) -> Tile {
        let (step_func, interact_func) = match &self.events {
            Some(ev) => (
                ev.step.clone().unwrap_or_default(),
                ev.interact.clone().unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };
        Tile {
            name: self.name,
            display_name: self.display_name,
            passable: self.passable,
            seethrough: self.seethrough,
            script,
            step_func,
            interact_func,
            image_path: self.image_path.unwrap_or_else(|| MISSING_IMAGE.to_string()),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
