use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a project directory and re-run every save-time validation
    Check {
        /// Project directory (the one holding manifest.json)
        project: PathBuf,
    },
    /// List the bindable function names of a Lua script
    Functions {
        /// A .lua script file
        script: PathBuf,
    },
    /// Load a project and write it back out (round-trip / migration)
    Resave {
        /// Source project directory
        input: PathBuf,
        /// Destination project directory
        output: PathBuf,
    },
}
