//! Emit one room: its JSON record plus the sidecar script files.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::records::{RoomRecord, TileRecord};
use crate::model::{Room, SYMBOL_COUNT, script_path, symbol_for};

/// Write `out_dir/<room>.json` and every non-empty tile script under
/// `out_dir/scripts/`. The caller has already validated the room.
pub fn emit(room: &Room, out_dir: &Path) -> Result<()> {
    let record = to_record(room)?;

    for tile in room.tileset() {
        if !tile.script.is_empty() {
            fs::write(out_dir.join(script_path(&tile.name)), &tile.script)?;
        }
    }

    let json = serde_json::to_string_pretty(&record)?;
    fs::write(out_dir.join(format!("{}.json", room.name)), json)?;
    Ok(())
}

/// Build the on-disk record: tiles keyed by their layout symbol (assigned in
/// tileset order from the a-z / A-Z / 0-9 alphabet) and the layout encoded
/// row by row, one symbol per cell, a newline after each row.
pub fn to_record(room: &Room) -> Result<RoomRecord> {
    let mut tileset = std::collections::BTreeMap::new();
    for (index, tile) in room.tileset().iter().enumerate() {
        let symbol = symbol_for(index).ok_or(Error::ScaleLimitExceeded {
            room: room.name.clone(),
            count: room.tileset().len(),
            max: SYMBOL_COUNT,
        })?;
        tileset.insert(symbol, TileRecord::from_tile(tile));
    }

    let mut layout = String::with_capacity((room.width() + 1) * room.height());
    for row in 0..room.height() {
        for col in 0..room.width() {
            let id = room.cell(row, col).ok_or_else(|| {
                Error::Validation(format!(
                    "tile at ({row}, {col}) is not set in room `{}`",
                    room.name
                ))
            })?;
            // cell ids index the tileset, so the symbol always exists
            let symbol = symbol_for(id.0).ok_or(Error::ScaleLimitExceeded {
                room: room.name.clone(),
                count: room.tileset().len(),
                max: SYMBOL_COUNT,
            })?;
            layout.push(symbol);
        }
        layout.push('\n');
    }

    Ok(RoomRecord { tileset, layout })
}
