use anyhow::Result;
use serde::Deserialize;

use crate::chart::grid::{
    BAND_FREQUENCY_MAX, BAND_FREQUENCY_MIN, BAND_INTENSITY_MAX, BAND_INTENSITY_MIN,
};

use super::decode::{decode_bytes, AudioData};
use super::spectrum::{ByteSpectrum, Window, FFT_SIZE};

/// Frequency and intensity envelope of a clip, in chart units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioExtremes {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AudioExtremes {
    /// Clamp raw extremes to the chart's display domain. An inverted
    /// frequency range collapses onto `x_min`.
    pub fn clamped(min_freq: f64, max_freq: f64, min_db: f64, max_db: f64) -> Self {
        let x_min = min_freq.clamp(BAND_FREQUENCY_MIN, BAND_FREQUENCY_MAX);
        let mut x_max = max_freq.clamp(BAND_FREQUENCY_MIN, BAND_FREQUENCY_MAX);
        if x_min > x_max {
            x_max = x_min;
        }
        Self {
            x_min,
            x_max,
            y_min: min_db.clamp(BAND_INTENSITY_MIN, BAND_INTENSITY_MAX),
            y_max: max_db.clamp(BAND_INTENSITY_MIN, BAND_INTENSITY_MAX),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Analysis {
    Band(AudioExtremes),
    /// No frame with spectral energy was seen before the clip ended or the
    /// frame budget ran out.
    Inconclusive { frames_polled: usize },
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnalyzerSettings {
    /// Display frames per second; one spectrum check per frame.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    #[serde(default = "default_min_decibels")]
    pub min_decibels: f32,
    #[serde(default = "default_max_decibels")]
    pub max_decibels: f32,
    #[serde(default)]
    pub window: Window,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            max_frames: default_max_frames(),
            smoothing: default_smoothing(),
            min_decibels: default_min_decibels(),
            max_decibels: default_max_decibels(),
            window: Window::default(),
        }
    }
}

fn default_frame_rate() -> u32 { 60 }
fn default_max_frames() -> usize { 600 }
// The spectrum fades in over the first frames, so the first frame that
// clears the -40 dB floor only lights the bins at the top of the main lobe.
fn default_smoothing() -> f32 { 0.9 }
fn default_min_decibels() -> f32 { -40.0 }
fn default_max_decibels() -> f32 { -10.0 }

/// Decode a clip and analyze it.
pub fn analyze_clip(bytes: Vec<u8>, name: &str, settings: &AnalyzerSettings) -> Result<Analysis> {
    let audio = decode_bytes(bytes, name)?;
    Ok(analyze(&audio, settings))
}

/// Play `audio` back on a display-frame clock and stop at the first frame
/// whose spectrum is not silent.
pub fn analyze(audio: &AudioData, settings: &AnalyzerSettings) -> Analysis {
    let samples = &audio.samples;
    let total = samples.len();
    let samples_per_frame = audio.sample_rate as f64 / settings.frame_rate.max(1) as f64;

    let mut spectrum = ByteSpectrum::new(
        settings.window,
        settings.smoothing,
        settings.min_decibels,
        settings.max_decibels,
    );

    // Checks begin once a full window has played (or the whole clip, if
    // shorter).
    let first_position = FFT_SIZE.min(total);
    let mut frame = (first_position as f64 / samples_per_frame).ceil().max(1.0) as usize;
    let mut frames_polled = 0;

    while frames_polled < settings.max_frames {
        let position = ((frame as f64 * samples_per_frame) as usize).min(total);
        let window = &samples[position.saturating_sub(FFT_SIZE)..position];
        let bins = spectrum.process(window);
        frames_polled += 1;

        if let Some(band) = scan_bins(&bins, audio.sample_rate) {
            log::info!(
                "Audible band after {} frame(s): {:.0}-{:.0} Hz, {:.1}-{:.1} dB",
                frames_polled,
                band.x_min,
                band.x_max,
                band.y_min,
                band.y_max
            );
            return Analysis::Band(band);
        }

        if position >= total {
            break;
        }
        frame += 1;
    }

    log::warn!(
        "No spectral energy found after {} frame(s); analysis inconclusive",
        frames_polled
    );
    Analysis::Inconclusive { frames_polled }
}

/// Extremes of one byte spectrum, or `None` if every bin is zero.
pub fn scan_bins(bins: &[u8], sample_rate: u32) -> Option<AudioExtremes> {
    let mut min_bin: Option<usize> = None;
    let mut max_bin = 0;
    let mut min_db = f64::INFINITY;
    let mut max_db = f64::NEG_INFINITY;

    for (i, &magnitude) in bins.iter().enumerate() {
        if magnitude == 0 {
            continue;
        }
        min_bin.get_or_insert(i);
        max_bin = i;

        // Distance below full scale, not a sound pressure level.
        let db = (20.0 * (magnitude as f64 / 255.0).log10()).abs();
        min_db = min_db.min(db);
        max_db = max_db.max(db);
    }

    let min_bin = min_bin?;
    let hz_per_bin = sample_rate as f64 / FFT_SIZE as f64;
    Some(AudioExtremes::clamped(
        min_bin as f64 * hz_per_bin,
        max_bin as f64 * hz_per_bin,
        min_db,
        max_db,
    ))
}
