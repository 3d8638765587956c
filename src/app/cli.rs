use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, VariantName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Standard,
    Scrubbable,
}

/// playchrome - custom playback controls for an embedded player
#[derive(Parser, Debug)]
#[command(name = "playchrome", version, about)]
pub struct Args {
    /// Identifier of the video to embed (file stem inside the media directory)
    pub video_id: Option<String>,

    /// Path to the config file (defaults to the user config directory)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory the video identifier is resolved in
    #[arg(long)]
    pub media_dir: Option<PathBuf>,

    /// Start playing as soon as the player is ready
    #[arg(long)]
    pub autoplay: bool,

    /// Start muted
    #[arg(long)]
    pub mute: bool,

    /// Control layout
    #[arg(long, value_enum)]
    pub variant: Option<VariantArg>,
}

impl Args {
    /// Layers command line values over the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref id) = self.video_id {
            config.video_id = id.clone();
        }
        if let Some(ref dir) = self.media_dir {
            config.media_dir = dir.clone();
        }
        if self.autoplay {
            config.player_vars.autoplay = 1;
        }
        if self.mute {
            config.player_vars.mute = 1;
        }
        if let Some(variant) = self.variant {
            config.variant = match variant {
                VariantArg::Standard => VariantName::Standard,
                VariantArg::Scrubbable => VariantName::Scrubbable,
            };
        }
    }
}
