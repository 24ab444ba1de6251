//! Load side: project directory → `Game`.
//!
//! `manifest.json` names the rooms; each room file carries its tileset keyed
//! by layout symbol plus the encoded layout. Tile scripts are sidecar files
//! resolved relative to the *room file's* directory, fetched through the
//! `ScriptLoader` seam so tests don't need a filesystem.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::records::{ManifestRecord, RoomRecord};
use crate::model::{Game, Room, Tile, TileId};

/// Fetches script text by the relative path recorded in a tile's `events`.
pub trait ScriptLoader {
    fn load_script(&self, rel_path: &str) -> Result<String>;
}

/// Reads scripts from disk, relative to a room file's directory.
pub struct DirScripts<'a> {
    pub base: &'a Path,
}

impl ScriptLoader for DirScripts<'_> {
    fn load_script(&self, rel_path: &str) -> Result<String> {
        Ok(fs::read_to_string(self.base.join(rel_path))?)
    }
}

/// Reconstruct a whole project from `dir` (the directory holding
/// `manifest.json`).
pub fn load_project(dir: &Path) -> Result<Game> {
    let manifest_text = fs::read_to_string(dir.join("manifest.json"))?;
    let manifest: ManifestRecord = serde_json::from_str(&manifest_text)
        .map_err(|e| Error::malformed("manifest.json", e))?;

    let mut game = Game::new();
    game.name = manifest.name;
    game.project_name = manifest.project_name;
    game.description = manifest.description;

    for (room_name, rel_path) in &manifest.rooms {
        let room_path = dir.join(rel_path);
        let room_text = fs::read_to_string(&room_path)?;
        let record: RoomRecord = serde_json::from_str(&room_text)
            .map_err(|e| Error::malformed(format!("room file `{rel_path}`"), e))?;

        // scripts live next to the room file, not under the project root
        let base = room_path.parent().unwrap_or(dir);
        let room = room_from_record(record, room_name.clone(), &DirScripts { base })?;
        game.add_room(room)?;
    }

    if !game.exists_room_with_name(&manifest.spawn.room_name) {
        return Err(Error::SpawnRoomNotFound(manifest.spawn.room_name));
    }
    game.spawn_room = Some(manifest.spawn.room_name);
    game.spawn_x_loc = Some(manifest.spawn.x_loc);
    game.spawn_y_loc = Some(manifest.spawn.y_loc);

    Ok(game)
}

/// Build a `Room` from its parsed record: materialize the tileset (loading
/// script text for tiles that have `events`), then decode the layout string
/// symbol by symbol.
pub fn room_from_record(
    record: RoomRecord,
    room_name: String,
    scripts: &dyn ScriptLoader,
) -> Result<Room> {
    let mut by_symbol: HashMap<char, TileId> = HashMap::new();
    let mut tileset = Vec::with_capacity(record.tileset.len());

    for (symbol, tile_rec) in record.tileset {
        let script = match &tile_rec.events {
            Some(ev) => scripts.load_script(&ev.script)?,
            None => String::new(),
        };
        let tile = tile_rec.into_tile(script);
        if tileset.iter().any(|t: &Tile| t.name == tile.name) {
            return Err(Error::Validation(format!(
                "duplicate tile name `{}` in room `{room_name}`",
                tile.name
            )));
        }
        by_symbol.insert(symbol, TileId(tileset.len()));
        tileset.push(tile);
    }

    let mut room = Room::from_parts(room_name, tileset);
    let mut width = None;
    for line in record.layout.split('\n') {
        // the final newline leaves one empty trailing line
        if line.is_empty() {
            continue;
        }
        let mut row = Vec::with_capacity(line.chars().count());
        for symbol in line.chars() {
            let id = by_symbol.get(&symbol).copied().ok_or(Error::UnknownSymbol {
                symbol,
                room: room.name.clone(),
            })?;
            row.push(Some(id));
        }
        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(Error::malformed(
                    format!("room file for `{}`", room.name),
                    format!("ragged layout: row of width {} after width {w}", row.len()),
                ));
            }
            Some(_) => {}
        }
        room.push_row(row);
    }

    Ok(room)
}
