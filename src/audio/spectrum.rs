use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::Deserialize;
use std::sync::Arc;

/// Transform size of the analysis window.
pub const FFT_SIZE: usize = 2048;
/// Number of magnitude bins the transform yields.
pub const BIN_COUNT: usize = FFT_SIZE / 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    #[default]
    Blackman,
    Hann,
    Rectangular,
}

impl Window {
    /// Periodic window coefficients (the denominator is `size`, not
    /// `size - 1`).
    pub fn coefficients(self, size: usize) -> Vec<f32> {
        let n = size as f32;
        (0..size)
            .map(|i| {
                let x = 2.0 * std::f32::consts::PI * i as f32 / n;
                match self {
                    Window::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                    Window::Hann => 0.5 * (1.0 - x.cos()),
                    Window::Rectangular => 1.0,
                }
            })
            .collect()
    }
}

/// Byte magnitude spectrum of the most recent window, smoothed over
/// successive frames. Levels between `min_decibels` and `max_decibels` are
/// spread linearly over 0..=255.
pub struct ByteSpectrum {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
}

impl ByteSpectrum {
    pub fn new(window: Window, smoothing: f32, min_decibels: f32, max_decibels: f32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        Self {
            fft,
            window: window.coefficients(FFT_SIZE),
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            smoothed: vec![0.0; BIN_COUNT],
            smoothing: smoothing.clamp(0.0, 1.0),
            min_decibels,
            max_decibels,
        }
    }

    /// Feed the `FFT_SIZE` samples ending at the playback position and
    /// return the current byte spectrum. Shorter input is zero-padded at the
    /// front.
    pub fn process(&mut self, samples: &[f32]) -> Vec<u8> {
        let offset = FFT_SIZE.saturating_sub(samples.len());
        let tail = &samples[samples.len().saturating_sub(FFT_SIZE)..];

        for c in self.buffer[..offset].iter_mut() {
            *c = Complex::new(0.0, 0.0);
        }
        for (i, &s) in tail.iter().enumerate() {
            let idx = offset + i;
            self.buffer[idx] = Complex::new(s * self.window[idx], 0.0);
        }

        self.fft.process(&mut self.buffer);

        let scale = 1.0 / FFT_SIZE as f32;
        let tau = self.smoothing;
        for (prev, c) in self.smoothed.iter_mut().zip(&self.buffer[..BIN_COUNT]) {
            let magnitude = c.norm() * scale;
            *prev = tau * *prev + (1.0 - tau) * magnitude;
        }

        let range = self.max_decibels - self.min_decibels;
        self.smoothed
            .iter()
            .map(|&m| {
                if m <= 0.0 || range <= 0.0 {
                    return 0;
                }
                let db = 20.0 * m.log10();
                let scaled = (255.0 / range * (db - self.min_decibels)).floor();
                scaled.clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}
