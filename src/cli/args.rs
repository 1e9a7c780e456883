//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Backend, Charset};

/// Convert an image into colored ASCII art
#[derive(Parser, Debug)]
#[command(name = "img-to-ascii")]
#[command(version, about = "Render images as ASCII art in the terminal", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image file to convert
    pub image: Option<PathBuf>,

    /// Output width in characters
    #[arg(long, short)]
    pub width: Option<usize>,

    /// Output height in characters (scaled by 0.75 for cell aspect)
    #[arg(long)]
    pub height: Option<usize>,

    /// Draw direction glyphs on strong edges
    #[arg(long, overrides_with = "no_edges")]
    pub edges: bool,

    /// Disable edge glyphs
    #[arg(long)]
    pub no_edges: bool,

    /// Use HSV value and hue emphasis
    #[arg(long, overrides_with = "no_hue")]
    pub hue: bool,

    /// Disable hue mode
    #[arg(long)]
    pub no_hue: bool,

    /// Emit 24-bit color escapes
    #[arg(long, overrides_with = "no_colors")]
    pub colors: bool,

    /// Disable 24-bit color output
    #[arg(long, overrides_with = "colors")]
    pub no_colors: bool,

    /// Edge detection backend
    #[arg(long)]
    pub edge_backend: Option<Backend>,

    /// HSV conversion backend
    #[arg(long)]
    pub color_backend: Option<Backend>,

    /// Use the accelerated backend for both stages
    #[arg(long, overrides_with = "no_accel")]
    pub accel: bool,

    /// Use the reference backend for both stages
    #[arg(long)]
    pub no_accel: bool,

    /// Edge detection workers (0 = all cores)
    #[arg(long, short)]
    pub threads: Option<usize>,

    /// Density ramp
    #[arg(long)]
    pub charset: Option<Charset>,

    /// Keep the alpha channel when decoding
    #[arg(long)]
    pub keep_alpha: bool,

    /// Run the pipeline without printing the image
    #[arg(long)]
    pub no_render: bool,

    /// Print METRIC lines with stage timings
    #[arg(long)]
    pub metrics: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

impl Args {
    /// `Some(true)` / `Some(false)` when edges were set on the command line.
    pub fn edges_override(&self) -> Option<bool> {
        flag_pair(self.edges, self.no_edges)
    }

    pub fn hue_override(&self) -> Option<bool> {
        flag_pair(self.hue, self.no_hue)
    }

    pub fn colors_override(&self) -> Option<bool> {
        flag_pair(self.colors, self.no_colors)
    }

    /// Combined backend switch from `--accel` / `--no-accel`.
    pub fn accel_override(&self) -> Option<Backend> {
        flag_pair(self.accel, self.no_accel).map(|on| {
            if on {
                Backend::Accelerated
            } else {
                Backend::Reference
            }
        })
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (_, true) => Some(false),
        (true, false) => Some(true),
        (false, false) => None,
    }
}
