//! Save side: `Game` → project directory.
//!
//! Validation runs to completion before anything touches the filesystem, so
//! a refused save leaves no partial manifest behind. The tree write itself is
//! sequential and not atomic; a crash mid-save can leave a partially written
//! project, which is acceptable for an editing tool.

pub mod room;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::records::{ManifestRecord, SpawnRecord};
use crate::model::{Game, Room, SYMBOL_COUNT, symbol_for};
use crate::script;

/// Validate and write the whole project under `dir` (created if needed).
///
/// Layout:
/// ```text
/// dir/manifest.json
/// dir/rooms/<room>.json
/// dir/rooms/scripts/<tile>_script.lua
/// ```
pub fn save_project(game: &Game, dir: &Path) -> Result<()> {
    let spawn = validate_game(game)?;

    fs::create_dir_all(dir)?;
    let rooms_dir = dir.join("rooms");
    fs::create_dir_all(&rooms_dir)?;
    fs::create_dir_all(rooms_dir.join("scripts"))?;

    let mut rooms = std::collections::BTreeMap::new();
    for r in &game.rooms {
        room::emit(r, &rooms_dir)?;
        rooms.insert(r.name.clone(), format!("rooms/{}.json", r.name));
    }

    let manifest = ManifestRecord {
        name: game.name.clone(),
        project_name: game.project_name.clone(),
        description: game.description.clone(),
        spawn,
        rooms,
    };
    fs::write(
        dir.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    Ok(())
}

/// All save-time rules, checked in a fixed order with the first failure
/// reported. Returns the validated spawn point.
pub fn validate_game(game: &Game) -> Result<SpawnRecord> {
    if game.project_name.is_empty() {
        return Err(Error::Validation("no project name specified".into()));
    }
    if game.name.is_empty() {
        return Err(Error::Validation("no game name specified".into()));
    }
    let spawn_room = game
        .spawn_room
        .as_deref()
        .ok_or_else(|| Error::Validation("no starting room specified".into()))?;
    let x = game
        .spawn_x_loc
        .filter(|v| *v >= 0)
        .ok_or_else(|| Error::Validation("spawn X location not specified".into()))?;
    let y = game
        .spawn_y_loc
        .filter(|v| *v >= 0)
        .ok_or_else(|| Error::Validation("spawn Y location not specified".into()))?;

    let room = game.room(spawn_room).ok_or_else(|| {
        Error::Validation(format!("starting room `{spawn_room}` does not exist"))
    })?;
    if x as usize >= room.width() || y as usize >= room.height() {
        return Err(Error::Validation(format!(
            "spawn location ({x}, {y}) is outside room `{spawn_room}` ({}x{})",
            room.width(),
            room.height()
        )));
    }

    let mut names = HashSet::new();
    for r in &game.rooms {
        if !names.insert(r.name.as_str()) {
            return Err(Error::Validation(format!("duplicate room name `{}`", r.name)));
        }
    }
    for r in &game.rooms {
        validate_room(r)?;
    }

    Ok(SpawnRecord {
        room_name: spawn_room.to_string(),
        x_loc: x,
        y_loc: y,
    })
}

/// Room-level save eligibility: fully laid out, unique tile names, within the
/// symbol alphabet, and every script parses and defines the handlers bound
/// to it.
pub fn validate_room(room: &Room) -> Result<()> {
    if let Some((row, col)) = room.first_unset() {
        return Err(Error::Validation(format!(
            "tile at ({row}, {col}) is not set in room `{}`",
            room.name
        )));
    }

    let mut names = HashSet::new();
    for tile in room.tileset() {
        if !names.insert(tile.name.as_str()) {
            return Err(Error::Validation(format!(
                "duplicate tile name `{}` in room `{}`",
                tile.name, room.name
            )));
        }
    }

    if symbol_for(room.tileset().len().saturating_sub(1)).is_none() {
        return Err(Error::ScaleLimitExceeded {
            room: room.name.clone(),
            count: room.tileset().len(),
            max: SYMBOL_COUNT,
        });
    }

    for tile in room.tileset() {
        if tile.script.is_empty() {
            if !tile.step_func.is_empty() || !tile.interact_func.is_empty() {
                return Err(Error::Validation(format!(
                    "tile `{}` in room `{}` binds an event handler but has no script",
                    tile.name, room.name
                )));
            }
            continue;
        }
        let funcs = script::extract_functions(&tile.script)?;
        for (event, func) in [("step", &tile.step_func), ("interact", &tile.interact_func)] {
            if !func.is_empty() && !funcs.iter().any(|f| f == func) {
                return Err(Error::Validation(format!(
                    "{event} handler `{func}` of tile `{}` in room `{}` is not defined in its script",
                    tile.name, room.name
                )));
            }
        }
    }

    Ok(())
}
