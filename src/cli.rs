use std::path::PathBuf;

use clap::Parser;

use crate::store::DEFAULT_TARGET_PALETTE;

/// Colorize ZX Spectrum art to various palettes.
#[derive(Parser, Debug)]
#[command(name = "zxart-palette", version, about)]
pub struct Args {
    /// Image drawn with the ZX Spectrum palette (optional with --tui)
    #[arg(short, long, required_unless_present_any = ["list", "tui"])]
    pub input: Option<PathBuf>,

    /// Where to write the result (defaults to <input>-<palette>.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target palette name
    #[arg(short, long, default_value = DEFAULT_TARGET_PALETTE)]
    pub palette: String,

    /// Read palette definitions from this TOML file instead of the built-in set
    #[arg(long, value_name = "FILE")]
    pub palettes: Option<PathBuf>,

    /// Print the available palette names and exit
    #[arg(long, conflicts_with_all = ["output", "tui"])]
    pub list: bool,

    /// Pick the image and palette interactively
    #[arg(long)]
    pub tui: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
