use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::chart::point::{Ear, Style};

#[derive(Parser, Debug)]
#[command(name = "audiogram", about = "Record and inspect patient audiograms")]
pub struct Cli {
    /// Config file (defaults to ./audiogram.toml or ~/.config/audiogram/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the patient service
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Patient id
    #[arg(short, long, global = true)]
    pub patient: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one audiogram
    Show {
        /// left, right or champLibre
        #[arg(short, long)]
        ear: Ear,
    },

    /// Add a threshold point, snapped to the clinical grid
    Add {
        #[arg(short, long)]
        ear: Ear,

        /// Marker: circle, A, I or AI
        #[arg(short, long, default_value = "circle")]
        style: Style,

        /// Canvas click position in pixels
        #[arg(long, num_args = 2, value_names = ["X", "Y"], conflicts_with_all = ["frequency", "decibels"])]
        at: Option<Vec<f64>>,

        /// Frequency in Hz (0-8000)
        #[arg(short, long, requires = "decibels")]
        frequency: Option<String>,

        /// Hearing level in dB (-10 to 120)
        #[arg(short, long, requires = "frequency")]
        decibels: Option<String>,

        /// Allow a point at a frequency another style already uses
        #[arg(long)]
        allow_mixed_styles: bool,
    },

    /// Remove a point by id
    Remove {
        #[arg(short, long)]
        ear: Ear,

        id: String,
    },

    /// Remove every point of one audiogram
    Clear {
        #[arg(short, long)]
        ear: Ear,
    },

    /// Find the audible band of a sound
    Analyze {
        /// Local audio file (WAV, MP3, FLAC, OGG)
        #[arg(conflicts_with = "sound", required_unless_present = "sound")]
        file: Option<PathBuf>,

        /// Name of a clip in the service's sound library
        #[arg(long)]
        sound: Option<String>,

        /// Overlay the band on this audiogram
        #[arg(short, long)]
        ear: Option<Ear>,
    },

    /// List the service's sound library
    Sounds,
}
