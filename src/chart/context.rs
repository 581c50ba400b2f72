use std::collections::HashMap;

use crate::audio::extremes::AudioExtremes;

use super::dataset::Chart;
use super::point::Ear;
use super::scale::ChartGeometry;

/// The three audiograms of one patient plus their audible band overlays.
/// Owned by whoever drives the UI and passed down explicitly.
#[derive(Debug, Default)]
pub struct ChartContext {
    pub geometry: ChartGeometry,
    left: Chart,
    right: Chart,
    champ_libre: Chart,
    bands: HashMap<Ear, AudioExtremes>,
}

impl ChartContext {
    pub fn new(geometry: ChartGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    pub fn chart(&self, ear: Ear) -> &Chart {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
            Ear::ChampLibre => &self.champ_libre,
        }
    }

    pub fn chart_mut(&mut self, ear: Ear) -> &mut Chart {
        match ear {
            Ear::Left => &mut self.left,
            Ear::Right => &mut self.right,
            Ear::ChampLibre => &mut self.champ_libre,
        }
    }

    pub fn band(&self, ear: Ear) -> Option<&AudioExtremes> {
        self.bands.get(&ear)
    }

    /// Replace the audible band overlay of `ear`.
    pub fn set_band(&mut self, ear: Ear, band: AudioExtremes) {
        self.bands.insert(ear, band);
    }

    pub fn clear_band(&mut self, ear: Ear) {
        self.bands.remove(&ear);
    }

    /// Canvas rectangle `(x0, y0, x1, y1)` covered by `ear`'s band.
    pub fn band_rect(&self, ear: Ear) -> Option<(f64, f64, f64, f64)> {
        let band = self.bands.get(&ear)?;
        let (x0, ya) = self.geometry.data_to_pixel(band.x_min, band.y_min);
        let (x1, yb) = self.geometry.data_to_pixel(band.x_max, band.y_max);
        Some((x0, ya.min(yb), x1, ya.max(yb)))
    }
}
