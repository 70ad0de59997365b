/*!
Pipette command line interface

Without a subcommand the interactive popup opens. The other subcommands work
on the same store headlessly; `pick` is the one to bind to a desktop hotkey.
*/

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::palette::ListError;
use crate::platform::PickError;

#[derive(Parser)]
#[command(name = "pipette")]
#[command(about = "Pick colors from anywhere on screen and keep a palette")]
#[command(version)]
pub struct Cli {
    /// Config script to load instead of ~/.config/pipette/init.rhai
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the interactive popup (the default)
    Popup {
        /// Keep history and favorites in memory only
        #[arg(long)]
        ephemeral: bool,
    },

    /// Sample a color, record it, and print its hex
    Pick,

    /// Print every representation of a color
    Describe {
        /// Color as #RRGGBB
        hex: String,

        /// Print a JSON object instead of aligned text
        #[arg(long)]
        json: bool,
    },

    /// Print recently picked colors, newest first
    History,

    /// Print saved colors, newest first
    Favorites,

    /// Save a color to favorites
    Save {
        /// Color as #RRGGBB
        hex: String,
    },

    /// Remove a color from favorites
    Remove {
        /// Color as #RRGGBB
        hex: String,
    },
}

/// Why a headless subcommand failed; printed on stderr
#[derive(Debug, Error)]
pub enum CliError {
    #[error("not a #RRGGBB color: {0}")]
    InvalidHex(String),
    #[error("no data directory for the color store")]
    NoDataDir,
    #[error(transparent)]
    List(#[from] ListError),
    #[error(transparent)]
    Pick(#[from] PickError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl Cli {
    /// The subcommand to run, defaulting to the popup
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Popup { ephemeral: false })
    }
}
