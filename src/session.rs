use anyhow::{Context, Result};
use std::fmt;

use crate::audio::extremes::{Analysis, AudioExtremes};
use crate::chart::context::ChartContext;
use crate::chart::dataset::{ConflictCheck, IgnoreReason, Placement, PlacementError};
use crate::chart::grid::{
    frequency_label, same_position, DECIBEL_LEVELS, DISPLAY_FREQUENCIES, STANDARD_FREQUENCIES,
};
use crate::chart::point::{DataPoint, Ear, Style};
use crate::chart::snap::{snap_decibel, snap_frequency};
use crate::chart::validate::{check_pixel, parse_entry};
use crate::remote::client::PointStore;
use crate::remote::record::PointRecord;

/// One patient's audiograms bound to a point store. Local state is updated
/// first; store failures are logged and do not roll it back.
pub struct Session<'a, S: PointStore> {
    pub context: ChartContext,
    patient: String,
    store: &'a S,
}

impl<'a, S: PointStore> Session<'a, S> {
    pub fn new(context: ChartContext, patient: impl Into<String>, store: &'a S) -> Self {
        Self {
            context,
            patient: patient.into(),
            store,
        }
    }

    /// Replace the local chart of `ear` with what the store holds.
    pub fn load(&mut self, ear: Ear) -> Result<usize> {
        let records = self
            .store
            .list(&self.patient, ear)
            .with_context(|| format!("Failed to load {} audiogram", ear))?;
        let count = records.len();
        self.context
            .chart_mut(ear)
            .replace_all(records.into_iter().map(PointRecord::into_point));
        log::info!("Loaded {} point(s) for patient {} ({})", count, self.patient, ear);
        Ok(count)
    }

    /// Place a point from a click on the chart canvas.
    pub fn add_at_pixel(
        &mut self,
        ear: Ear,
        pixel_x: f64,
        pixel_y: f64,
        style: Style,
        check: ConflictCheck,
    ) -> Result<Placement> {
        let (pixel_x, pixel_y) = check_pixel(pixel_x, pixel_y)?;
        let (raw_frequency, raw_decibels) = self.context.geometry.pixel_to_data(pixel_x, pixel_y);
        log::debug!(
            "Click ({:.0}, {:.0}) -> {:.1} Hz, {:.1} dB",
            pixel_x,
            pixel_y,
            raw_frequency,
            raw_decibels
        );
        Ok(self.add_raw(ear, raw_frequency, raw_decibels, style, check)?)
    }

    /// Place a point from typed values; they are validated before snapping.
    pub fn add_entry(
        &mut self,
        ear: Ear,
        frequency: &str,
        decibels: &str,
        style: Style,
        check: ConflictCheck,
    ) -> Result<Placement> {
        let (frequency, decibels) = parse_entry(frequency, decibels)?;
        Ok(self.add_raw(ear, frequency, decibels, style, check)?)
    }

    fn add_raw(
        &mut self,
        ear: Ear,
        raw_frequency: f64,
        raw_decibels: f64,
        style: Style,
        check: ConflictCheck,
    ) -> Result<Placement, PlacementError> {
        let frequency = snap_frequency(raw_frequency, STANDARD_FREQUENCIES);
        let decibels = snap_decibel(raw_decibels, DECIBEL_LEVELS);
        let candidate = DataPoint::new(frequency, decibels, style);

        let placement = self.context.chart_mut(ear).place(candidate, check)?;
        match &placement {
            Placement::Inserted(point) => {
                log::info!(
                    "Added {} point at {} Hz / {} dB ({})",
                    point.style,
                    point.frequency,
                    point.decibels,
                    ear
                );
                let record = PointRecord::from_point(ear, point);
                if let Err(e) = self.store.save(&self.patient, ear, &record) {
                    log::warn!("Point {} kept locally but not saved: {:#}", point.id, e);
                }
            }
            Placement::Ignored(IgnoreReason::SameValue) => {
                log::info!("Point at {} Hz / {} dB already exists", frequency, decibels);
            }
            Placement::Ignored(IgnoreReason::SameStyleAtFrequency) => {
                log::info!("A {} point already exists at {} Hz", style, frequency);
            }
        }
        Ok(placement)
    }

    pub fn remove(&mut self, ear: Ear, id: &str) -> Option<DataPoint> {
        let removed = self.context.chart_mut(ear).remove(id);
        if removed.is_none() {
            log::warn!("No point {} on the {} audiogram", id, ear);
        }
        // The store may hold the point even if this copy of the chart is stale
        if let Err(e) = self.store.delete(&self.patient, ear, id) {
            log::warn!("Failed to delete point {} from store: {:#}", id, e);
        }
        removed
    }

    pub fn delete_all(&mut self, ear: Ear) {
        self.context.chart_mut(ear).clear();
        if let Err(e) = self.store.delete_all(&self.patient, ear) {
            log::warn!("Failed to delete {} points from store: {:#}", ear, e);
        }
    }

    /// Show the audible band of an analysis on `ear`'s chart. An
    /// inconclusive analysis removes any previous band.
    pub fn annotate(&mut self, ear: Ear, analysis: Analysis) -> Option<AudioExtremes> {
        match analysis {
            Analysis::Band(band) => {
                self.context.set_band(ear, band);
                Some(band)
            }
            Analysis::Inconclusive { .. } => {
                self.context.clear_band(ear);
                None
            }
        }
    }

    /// Text rendering of one audiogram: a threshold table over the axis
    /// ticks, the full point list and the band overlay.
    pub fn render(&self, ear: Ear) -> String {
        AudiogramView {
            patient: &self.patient,
            ear,
            context: &self.context,
        }
        .to_string()
    }
}

struct AudiogramView<'a> {
    patient: &'a str,
    ear: Ear,
    context: &'a ChartContext,
}

impl fmt::Display for AudiogramView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.context.chart(self.ear);
        writeln!(f, "Patient {} - {} ear", self.patient, self.ear)?;

        write!(f, "  {:<8}", "Hz")?;
        for &freq in DISPLAY_FREQUENCIES {
            write!(f, "{:>6}", frequency_label(freq))?;
        }
        writeln!(f)?;
        for style in [Style::Circle, Style::A, Style::I, Style::AI] {
            let bucket = chart.bucket(style);
            if bucket.is_empty() {
                continue;
            }
            write!(f, "  {:<8}", style)?;
            for &freq in DISPLAY_FREQUENCIES {
                match bucket.iter().find(|p| same_position(p.frequency, freq)) {
                    Some(p) => write!(f, "{:>6}", p.decibels)?,
                    None => write!(f, "{:>6}", ".")?,
                }
            }
            writeln!(f)?;
        }

        write!(f, "{}", chart)?;
        if let (Some(band), Some((x0, y0, x1, y1))) =
            (self.context.band(self.ear), self.context.band_rect(self.ear))
        {
            writeln!(
                f,
                "  audible band: {}-{} Hz, {:.1}-{:.1} dB (canvas {:.0},{:.0} to {:.0},{:.0})",
                frequency_label(band.x_min),
                frequency_label(band.x_max),
                band.y_min,
                band.y_max,
                x0,
                y0,
                x1,
                y1
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::scale::ChartGeometry;
    use crate::chart::validate::ValidationError;
    use anyhow::anyhow;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryStore {
        records: RefCell<Vec<(Ear, PointRecord)>>,
        fail: bool,
    }

    impl PointStore for MemoryStore {
        fn save(&self, _patient: &str, ear: Ear, record: &PointRecord) -> Result<()> {
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            self.records.borrow_mut().push((ear, record.clone()));
            Ok(())
        }

        fn list(&self, _patient: &str, ear: Ear) -> Result<Vec<PointRecord>> {
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(self
                .records
                .borrow()
                .iter()
                .filter(|(e, _)| *e == ear)
                .map(|(_, r)| r.clone())
                .collect())
        }

        fn delete(&self, _patient: &str, ear: Ear, id: &str) -> Result<()> {
            self.records
                .borrow_mut()
                .retain(|(e, r)| !(*e == ear && r.id == id));
            Ok(())
        }

        fn delete_all(&self, _patient: &str, ear: Ear) -> Result<()> {
            self.records.borrow_mut().retain(|(e, _)| *e != ear);
            Ok(())
        }
    }

    fn session(store: &MemoryStore) -> Session<'_, MemoryStore> {
        Session::new(ChartContext::new(ChartGeometry::default()), "7", store)
    }

    #[test]
    fn entry_is_snapped_and_saved() {
        let store = MemoryStore::default();
        let mut s = session(&store);
        let placement = s
            .add_entry(Ear::Left, "1320", "23", Style::Circle, ConflictCheck::Enforce)
            .unwrap();
        let Placement::Inserted(point) = placement else {
            panic!("expected insertion");
        };
        assert_eq!(point.frequency, 1000.0);
        assert_eq!(point.decibels, 20.0);
        assert_eq!(store.records.borrow().len(), 1);
        assert_eq!(store.records.borrow()[0].1.id, point.id);
    }

    #[test]
    fn invalid_entry_never_reaches_the_chart() {
        let store = MemoryStore::default();
        let mut s = session(&store);
        let err = s
            .add_entry(Ear::Left, "9500", "20", Style::Circle, ConflictCheck::Enforce)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::FrequencyOutOfRange(9500.0))
        );
        assert!(s.context.chart(Ear::Left).is_empty());
    }

    #[test]
    fn conflict_surfaces_as_error() {
        let store = MemoryStore::default();
        let mut s = session(&store);
        s.add_entry(Ear::Right, "1000", "20", Style::Circle, ConflictCheck::Enforce)
            .unwrap();
        // 25 dB snaps onto the existing 20 dB level; the style clash still wins
        let err = s
            .add_entry(Ear::Right, "1000", "25", Style::A, ConflictCheck::Enforce)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<PlacementError>(),
            Some(&PlacementError::StyleConflict {
                frequency: 1000.0,
                existing: Style::Circle,
                requested: Style::A,
            })
        );
        assert_eq!(s.context.chart(Ear::Right).len(), 1);
        assert_eq!(store.records.borrow().len(), 1);
    }

    #[test]
    fn non_finite_click_is_rejected() {
        let store = MemoryStore::default();
        let mut s = session(&store);
        for _ in 0..2 {
            let err = s
                .add_at_pixel(Ear::Left, f64::NAN, 100.0, Style::Circle, ConflictCheck::Enforce)
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ValidationError>(),
                Some(ValidationError::NonFinitePixel(..))
            ));
        }
        assert!(s
            .add_at_pixel(Ear::Left, 400.0, f64::INFINITY, Style::A, ConflictCheck::Enforce)
            .is_err());
        assert!(s.context.chart(Ear::Left).is_empty());
        assert!(store.records.borrow().is_empty());
    }

    #[test]
    fn click_goes_through_axis_inversion() {
        let store = MemoryStore::default();
        let mut s = session(&store);
        let (x, y) = s.context.geometry.data_to_pixel(2000.0, 40.0);
        let placement = s
            .add_at_pixel(Ear::ChampLibre, x + 3.0, y + 2.0, Style::AI, ConflictCheck::Enforce)
            .unwrap();
        let Placement::Inserted(point) = placement else {
            panic!("expected insertion");
        };
        assert_eq!((point.frequency, point.decibels), (2000.0, 40.0));
    }

    #[test]
    fn store_failure_keeps_local_point() {
        let store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };
        let mut s = session(&store);
        let placement = s
            .add_entry(Ear::Left, "500", "30", Style::I, ConflictCheck::Enforce)
            .unwrap();
        assert!(matches!(placement, Placement::Inserted(_)));
        assert_eq!(s.context.chart(Ear::Left).len(), 1);
        assert!(s.load(Ear::Left).is_err());
    }

    #[test]
    fn load_remove_and_delete_all() {
        let store = MemoryStore::default();
        {
            let mut s = session(&store);
            s.add_entry(Ear::Left, "4000", "60", Style::Circle, ConflictCheck::Enforce)
                .unwrap();
            s.add_entry(Ear::Left, "250", "10", Style::Circle, ConflictCheck::Enforce)
                .unwrap();
            s.add_entry(Ear::Right, "250", "10", Style::Circle, ConflictCheck::Enforce)
                .unwrap();
        }

        let mut s = session(&store);
        assert_eq!(s.load(Ear::Left).unwrap(), 2);
        let freqs: Vec<f64> = s
            .context
            .chart(Ear::Left)
            .bucket(Style::Circle)
            .iter()
            .map(|p| p.frequency)
            .collect();
        assert_eq!(freqs, vec![250.0, 4000.0]);

        let id = s.context.chart(Ear::Left).bucket(Style::Circle)[0].id.clone();
        assert!(s.remove(Ear::Left, &id).is_some());
        assert_eq!(s.context.chart(Ear::Left).len(), 1);
        assert_eq!(store.list("7", Ear::Left).unwrap().len(), 1);

        s.delete_all(Ear::Left);
        assert!(s.context.chart(Ear::Left).is_empty());
        assert!(store.list("7", Ear::Left).unwrap().is_empty());
        assert_eq!(store.list("7", Ear::Right).unwrap().len(), 1);
    }

    #[test]
    fn annotation_follows_analysis() {
        let store = MemoryStore::default();
        let mut s = session(&store);
        let band = AudioExtremes {
            x_min: 250.0,
            x_max: 4000.0,
            y_min: 3.0,
            y_max: 40.0,
        };
        assert_eq!(s.annotate(Ear::Left, Analysis::Band(band)), Some(band));
        assert!(s.render(Ear::Left).contains("audible band: 250-4K Hz"));
        s.add_entry(Ear::Left, "1000", "35", Style::Circle, ConflictCheck::Enforce)
            .unwrap();
        let rendered = s.render(Ear::Left);
        assert!(rendered.contains("circle"));
        // 35 dB is drawn at its snapped level
        assert!(rendered.contains("    1K Hz     30 dB"));
        assert_eq!(
            s.annotate(Ear::Left, Analysis::Inconclusive { frames_polled: 600 }),
            None
        );
        assert!(s.context.band(Ear::Left).is_none());
    }
}
