use std::path::PathBuf;

use clap::Parser;

use super::SceneConfig;

/// Command-line arguments. Anything given here overrides the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Animated solar system viewer")]
pub struct CliArgs {
    /// Path to a RON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height
    #[arg(long)]
    pub height: Option<u32>,

    /// Scene seconds per real second
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Start with time stopped
    #[arg(long)]
    pub paused: bool,

    /// Directory holding the body textures
    #[arg(long)]
    pub textures: Option<PathBuf>,

    /// RON file with a custom body table
    #[arg(long)]
    pub bodies: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl SceneConfig {
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(scale) = args.time_scale {
            self.time.time_scale = scale;
        }
        if args.paused {
            self.time.start_paused = true;
        }
        if let Some(ref dir) = args.textures {
            self.assets.texture_dir = Some(dir.clone());
        }
        if let Some(ref file) = args.bodies {
            self.assets.bodies_file = Some(file.clone());
        }
        if let Some(ref level) = args.log_level {
            self.log_level = level.clone();
        }
    }
}
