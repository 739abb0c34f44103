//! Command-line argument parsing for the LOD fix tool.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Trian LOD fix command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(
    name = "trian-lodfix",
    about = "Remove renderers shared between nested LOD groups"
)]
pub struct CliArgs {
    /// Scene description (RON) to fix.
    pub input: PathBuf,

    /// Where to write the fixed scene (defaults to `<input stem><suffix>.ron`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reject hierarchies nested deeper than this.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Report what would change without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Pin the last level of every LOD group so it never culls out.
    #[arg(long)]
    pub keep_last_visible: bool,

    /// Overwrite the input file with the fixed scene.
    #[arg(long)]
    pub in_place: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// Flags only ever switch a setting on; an absent flag keeps the config value.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(depth) = args.max_depth {
            self.fix.max_depth = depth;
        }
        if args.dry_run {
            self.fix.dry_run = true;
        }
        if args.keep_last_visible {
            self.fix.last_level_always_visible = true;
        }
        if args.in_place {
            self.output.overwrite_input = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
