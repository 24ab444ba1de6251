//! In-memory project model: `Tile`, `Room`, `Game`.
//!
//! A `Game` owns its `Room`s; a `Room` owns its tileset and a rectangular
//! grid of cells. Cells hold a `TileId` (an index into the owning tileset)
//! rather than a tile reference, so "every cell using this tile" is a plain
//! equality scan.

pub mod records;

use crate::error::{Error, Result};

/// Symbols available for the compact layout encoding, in assignment order:
/// a-z, then A-Z, then 0-9.
pub const SYMBOL_COUNT: usize = 62;

/// Symbol assigned to the `index`-th tile of a tileset.
pub fn symbol_for(index: usize) -> Option<char> {
    match index {
        0..=25 => Some((b'a' + index as u8) as char),
        26..=51 => Some((b'A' + (index - 26) as u8) as char),
        52..=61 => Some((b'0' + (index - 52) as u8) as char),
        _ => None,
    }
}

/// Relative path (inside a room directory) of a tile's script file.
pub fn script_path(tile_name: &str) -> String {
    format!("scripts/{tile_name}_script.lua")
}

/// Sentinel used when a tile record carries no image reference.
pub const MISSING_IMAGE: &str = "error.png";

/// ─────────────────────────────────────────────────────
/// Tile
/// ─────────────────────────────────────────────────────

/// One tile-type definition. `name` doubles as the identifier inside a
/// tileset and as the script filename stem; an empty `script` means the tile
/// has no behavior, and empty `step_func` / `interact_func` mean the
/// corresponding event is unbound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub name: String,
    pub display_name: String,
    pub passable: bool,
    pub seethrough: bool,
    pub script: String,
    pub step_func: String,
    pub interact_func: String,
    pub image_path: String,
}

impl Tile {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            passable: false,
            seethrough: false,
            script: String::new(),
            step_func: String::new(),
            interact_func: String::new(),
            image_path: MISSING_IMAGE.to_string(),
        }
    }
}

/// Index of a tile inside its owning room's tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub usize);

/// ─────────────────────────────────────────────────────
/// Room
/// ─────────────────────────────────────────────────────

/// A named rectangular grid of tile placements plus the tile types it uses.
///
/// The grid is stored row-major and only ever addressed as `(row, col)`
/// through `cell` / `set_cell`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: String,
    tileset: Vec<Tile>,
    layout: Vec<Vec<Option<TileId>>>,
}

impl Room {
    /// A `width × height` room with every cell unset and an empty tileset.
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            tileset: Vec::new(),
            layout: vec![vec![None; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.layout.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.layout.len()
    }

    pub fn tileset(&self) -> &[Tile] {
        &self.tileset
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tileset.get(id.0)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tileset.get_mut(id.0)
    }

    /// Add a tile type to the tileset. Tile names identify scripts and
    /// records, so duplicates are refused.
    pub fn add_tile(&mut self, tile: Tile) -> Result<TileId> {
        if self.tileset.iter().any(|t| t.name == tile.name) {
            return Err(Error::Validation(format!(
                "tile `{}` already exists in room `{}`",
                tile.name, self.name
            )));
        }
        self.tileset.push(tile);
        Ok(TileId(self.tileset.len() - 1))
    }

    /// Remove a tile type: clears every cell holding it and shifts the ids
    /// of the tiles after it down by one.
    pub fn remove_tile(&mut self, id: TileId) {
        if id.0 >= self.tileset.len() {
            return;
        }
        self.tileset.remove(id.0);
        for row in &mut self.layout {
            for cell in row.iter_mut() {
                *cell = match *cell {
                    Some(c) if c == id => None,
                    Some(c) if c.0 > id.0 => Some(TileId(c.0 - 1)),
                    other => other,
                };
            }
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<TileId> {
        self.layout.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn set_cell(&mut self, row: usize, col: usize, id: Option<TileId>) {
        if let Some(cell) = self.layout.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = id;
        }
    }

    /// First unset cell in row-major scan order, or `None` when the room is
    /// fully laid out (and therefore save-eligible).
    pub fn first_unset(&self) -> Option<(usize, usize)> {
        for (row, cells) in self.layout.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_none() {
                    return Some((row, col));
                }
            }
        }
        None
    }

    pub(crate) fn push_row(&mut self, row: Vec<Option<TileId>>) {
        self.layout.push(row);
    }

    pub(crate) fn from_parts(name: String, tileset: Vec<Tile>) -> Self {
        Self {
            name,
            tileset,
            layout: Vec::new(),
        }
    }
}

/// ─────────────────────────────────────────────────────
/// Game
/// ─────────────────────────────────────────────────────

/// The top-level authored unit: metadata, rooms and the spawn point.
///
/// There is no ambient "current project"; the editing surface owns the one
/// live `Game` and passes it into every operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Game {
    pub name: String,
    pub project_name: String,
    pub description: String,
    pub rooms: Vec<Room>,
    /// Name of the room gameplay starts in; must match a member of `rooms`.
    pub spawn_room: Option<String>,
    pub spawn_x_loc: Option<i32>,
    pub spawn_y_loc: Option<i32>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    pub fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.name == name)
    }

    pub fn exists_room_with_name(&self, name: &str) -> bool {
        self.room(name).is_some()
    }

    pub fn add_room(&mut self, room: Room) -> Result<()> {
        if self.exists_room_with_name(&room.name) {
            return Err(Error::Validation(format!(
                "room `{}` already exists",
                room.name
            )));
        }
        self.rooms.push(room);
        Ok(())
    }

    /// Remove a room; a spawn point referring to it is cleared as well.
    pub fn remove_room(&mut self, name: &str) {
        self.rooms.retain(|r| r.name != name);
        if self.spawn_room.as_deref() == Some(name) {
            self.spawn_room = None;
        }
    }
}
