pub mod cli;
pub mod error;
pub mod model;
pub mod parser;
pub mod script;
pub mod writer;

use std::path::Path;

use anyhow::Context;
use clap::Parser;

pub use error::{Error, Result};
pub use model::{Game, Room, Tile, TileId};

/// A fresh, empty project for the editing surface to fill in.
pub fn new_project() -> Game {
    Game::new()
}

/// Read a project directory back into a `Game`.
pub fn load_project(path: &Path) -> Result<Game> {
    parser::load_project(path)
}

/// Validate and write a project directory.
pub fn save_project(game: &Game, path: &Path) -> Result<()> {
    writer::save_project(game, path)
}

/// Save-eligibility of a single room; `Ok(())` iff every cell is set and all
/// tile scripts/handlers hold up.
pub fn validate_room(room: &Room) -> Result<()> {
    writer::validate_room(room)
}

/// Ordered top-level function names of a script, for handler binding.
pub fn extract_function_names(script_source: &str) -> Result<Vec<String>> {
    script::extract_functions(script_source)
}

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    match args.command {
        cli::Command::Check { project } => {
            let game = load_project(&project)
                .with_context(|| format!("Loading {}", project.display()))?;
            writer::validate_game(&game).with_context(|| "Validating project")?;
            println!(
                "{}: {} room(s), spawn in `{}` - ok",
                game.project_name,
                game.rooms.len(),
                game.spawn_room.as_deref().unwrap_or("?"),
            );
        }
        cli::Command::Functions { script } => {
            let src = std::fs::read_to_string(&script)
                .with_context(|| format!("Reading {}", script.display()))?;
            let names = extract_function_names(&src)
                .with_context(|| format!("Parsing {}", script.display()))?;
            for name in names {
                println!("{name}");
            }
        }
        cli::Command::Resave { input, output } => {
            let game = load_project(&input)
                .with_context(|| format!("Loading {}", input.display()))?;
            save_project(&game, &output)
                .with_context(|| format!("Saving {}", output.display()))?;
            println!("Saved to {}", output.display());
        }
    }

    Ok(())
}
