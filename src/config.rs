use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::extremes::AnalyzerSettings;
use crate::chart::scale::{AxisScale, ChartGeometry};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub analyzer: AnalyzerSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_sounds_path")]
    pub sounds_path: String,
    #[serde(default)]
    pub patient: Option<String>,
}

/// Canvas placement of the plot area and the axis domains.
#[derive(Debug, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_left")]
    pub left: f64,
    #[serde(default = "default_top")]
    pub top: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_frequency_min")]
    pub frequency_min: f64,
    #[serde(default = "default_frequency_max")]
    pub frequency_max: f64,
    #[serde(default = "default_decibel_min")]
    pub decibel_min: f64,
    #[serde(default = "default_decibel_max")]
    pub decibel_max: f64,
    #[serde(default = "default_reverse_decibels")]
    pub reverse_decibels: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sounds_path: default_sounds_path(),
            patient: None,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            left: default_left(),
            top: default_top(),
            width: default_width(),
            height: default_height(),
            frequency_min: default_frequency_min(),
            frequency_max: default_frequency_max(),
            decibel_min: default_decibel_min(),
            decibel_max: default_decibel_max(),
            reverse_decibels: default_reverse_decibels(),
        }
    }
}

impl ChartConfig {
    pub fn geometry(&self) -> ChartGeometry {
        ChartGeometry {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
            frequency: AxisScale::Logarithmic {
                min: self.frequency_min,
                max: self.frequency_max,
            },
            decibels: AxisScale::Linear {
                min: self.decibel_min,
                max: self.decibel_max,
            },
            reverse_decibels: self.reverse_decibels,
        }
    }
}

fn default_base_url() -> String { "http://localhost:3000".into() }
fn default_sounds_path() -> String { "audios".into() }
fn default_left() -> f64 { 50.0 }
fn default_top() -> f64 { 30.0 }
fn default_width() -> f64 { 800.0 }
fn default_height() -> f64 { 500.0 }
fn default_frequency_min() -> f64 { 125.0 }
fn default_frequency_max() -> f64 { 8000.0 }
fn default_decibel_min() -> f64 { -10.0 }
fn default_decibel_max() -> f64 { 120.0 }
fn default_reverse_decibels() -> bool { true }

/// Explicit path, else `audiogram.toml` in the working directory, else the
/// per-user config file.
pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("audiogram.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("audiogram").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("audiogram").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Option<Config> {
    match toml::from_str(content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Invalid config: {}", e);
            None
        }
    }
}
