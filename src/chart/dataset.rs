use std::collections::BTreeMap;
use std::fmt;

use super::grid::{frequency_label, same_position};
use super::point::{DataPoint, Style};

/// Points of one audiogram, bucketed by style. Each bucket is kept in
/// ascending frequency order.
#[derive(Clone, Debug, Default)]
pub struct Chart {
    buckets: BTreeMap<Style, Vec<DataPoint>>,
}

/// Whether a different-style point at the same frequency blocks placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictCheck {
    Enforce,
    Skip,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    Inserted(DataPoint),
    Ignored(IgnoreReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A point with the same frequency and level exists.
    SameValue,
    /// A point of the same style already claims this frequency.
    SameStyleAtFrequency,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlacementError {
    #[error("a point with style {existing} already exists at {frequency} Hz; remove it before adding a {requested} point")]
    StyleConflict {
        frequency: f64,
        existing: Style,
        requested: Style,
    },
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, style: Style) -> &[DataPoint] {
        self.buckets.get(&style).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn points(&self) -> impl Iterator<Item = &DataPoint> {
        self.buckets.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if a point with `style` already sits at `frequency`.
    pub fn is_duplicate_by_style(&self, frequency: f64, style: Style) -> bool {
        self.bucket(style)
            .iter()
            .any(|p| same_position(p.frequency, frequency))
    }

    /// Style of a point with a different style than `style` at `frequency`,
    /// if any.
    pub fn has_style_conflict(&self, frequency: f64, style: Style) -> Option<Style> {
        self.points()
            .find(|p| p.style != style && same_position(p.frequency, frequency))
            .map(|p| p.style)
    }

    /// True if any point matches both coordinates, whatever its style.
    pub fn is_duplicate_by_value(&self, frequency: f64, decibels: f64) -> bool {
        self.points()
            .any(|p| same_position(p.frequency, frequency) && same_position(p.decibels, decibels))
    }

    /// Append `point` to its style bucket and restore frequency order.
    pub fn insert_sorted(&mut self, point: DataPoint) {
        let bucket = self.buckets.entry(point.style).or_default();
        bucket.push(point);
        bucket.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
    }

    /// Run the duplicate checks and insert `candidate` if it passes. A
    /// rejected candidate leaves the chart untouched.
    ///
    /// With `ConflictCheck::Enforce` a different style at the same frequency
    /// is an error even when the levels also match.
    pub fn place(
        &mut self,
        candidate: DataPoint,
        check: ConflictCheck,
    ) -> Result<Placement, PlacementError> {
        if check == ConflictCheck::Enforce {
            if let Some(existing) = self.has_style_conflict(candidate.frequency, candidate.style) {
                return Err(PlacementError::StyleConflict {
                    frequency: candidate.frequency,
                    existing,
                    requested: candidate.style,
                });
            }
        }
        if self.is_duplicate_by_value(candidate.frequency, candidate.decibels) {
            return Ok(Placement::Ignored(IgnoreReason::SameValue));
        }
        if self.is_duplicate_by_style(candidate.frequency, candidate.style) {
            return Ok(Placement::Ignored(IgnoreReason::SameStyleAtFrequency));
        }

        self.insert_sorted(candidate.clone());
        Ok(Placement::Inserted(candidate))
    }

    pub fn remove(&mut self, id: &str) -> Option<DataPoint> {
        for bucket in self.buckets.values_mut() {
            if let Some(idx) = bucket.iter().position(|p| p.id == id) {
                return Some(bucket.remove(idx));
            }
        }
        None
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Replace every point, as after a reload from the server.
    pub fn replace_all(&mut self, points: impl IntoIterator<Item = DataPoint>) {
        self.clear();
        for point in points {
            self.insert_sorted(point);
        }
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "  (no points)");
        }
        for (style, bucket) in &self.buckets {
            if bucket.is_empty() {
                continue;
            }
            writeln!(f, "  [{}]", style)?;
            for p in bucket {
                writeln!(
                    f,
                    "    {:>6} Hz  {:>5} dB  {}",
                    frequency_label(p.frequency),
                    p.decibels,
                    p.id
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(frequency: f64, decibels: f64, style: Style) -> DataPoint {
        DataPoint::new(frequency, decibels, style)
    }

    #[test]
    fn same_point_twice_is_stored_once() {
        let mut chart = Chart::new();
        let first = chart.place(point(1000.0, 20.0, Style::Circle), ConflictCheck::Enforce);
        assert!(matches!(first, Ok(Placement::Inserted(_))));
        let second = chart.place(point(1000.0, 20.0, Style::Circle), ConflictCheck::Enforce);
        assert_eq!(second, Ok(Placement::Ignored(IgnoreReason::SameValue)));
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn value_duplicate_ignores_style() {
        let mut chart = Chart::new();
        chart.insert_sorted(point(1000.0, 20.0, Style::Circle));
        assert!(chart.is_duplicate_by_value(1000.05, 20.1));
        let res = chart.place(point(1000.0, 20.0, Style::AI), ConflictCheck::Skip);
        assert_eq!(res, Ok(Placement::Ignored(IgnoreReason::SameValue)));
    }

    #[test]
    fn different_style_at_same_frequency_conflicts() {
        let mut chart = Chart::new();
        chart.place(point(1000.0, 20.0, Style::Circle), ConflictCheck::Enforce).unwrap();

        let res = chart.place(point(1000.0, 25.0, Style::A), ConflictCheck::Enforce);
        assert_eq!(
            res,
            Err(PlacementError::StyleConflict {
                frequency: 1000.0,
                existing: Style::Circle,
                requested: Style::A,
            })
        );
        assert_eq!(chart.len(), 1);

        let res = chart.place(point(2000.0, 25.0, Style::A), ConflictCheck::Enforce);
        assert!(matches!(res, Ok(Placement::Inserted(_))));
        assert_eq!(chart.len(), 2);
    }

    #[test]
    fn conflict_wins_over_matching_level() {
        let mut chart = Chart::new();
        chart.insert_sorted(point(1000.0, 20.0, Style::Circle));

        let res = chart.place(point(1000.0, 20.0, Style::A), ConflictCheck::Enforce);
        assert!(matches!(res, Err(PlacementError::StyleConflict { .. })));

        let res = chart.place(point(1000.0, 20.0, Style::A), ConflictCheck::Skip);
        assert_eq!(res, Ok(Placement::Ignored(IgnoreReason::SameValue)));
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn conflict_check_can_be_skipped() {
        let mut chart = Chart::new();
        chart.insert_sorted(point(1000.0, 20.0, Style::Circle));
        let res = chart.place(point(1000.0, 25.0, Style::A), ConflictCheck::Skip);
        assert!(matches!(res, Ok(Placement::Inserted(_))));
        assert_eq!(chart.bucket(Style::A).len(), 1);
    }

    #[test]
    fn same_style_at_frequency_is_ignored() {
        let mut chart = Chart::new();
        chart.insert_sorted(point(500.0, 30.0, Style::I));
        assert!(chart.is_duplicate_by_style(500.0, Style::I));
        assert!(!chart.is_duplicate_by_style(500.0, Style::A));
        let res = chart.place(point(500.0, 60.0, Style::I), ConflictCheck::Enforce);
        assert_eq!(res, Ok(Placement::Ignored(IgnoreReason::SameStyleAtFrequency)));
        assert_eq!(chart.bucket(Style::I)[0].decibels, 30.0);
    }

    #[test]
    fn buckets_stay_sorted() {
        let mut chart = Chart::new();
        chart.place(point(2000.0, 20.0, Style::Circle), ConflictCheck::Enforce).unwrap();
        chart.place(point(500.0, 20.0, Style::Circle), ConflictCheck::Enforce).unwrap();
        chart.place(point(1000.0, 30.0, Style::Circle), ConflictCheck::Enforce).unwrap();
        let freqs: Vec<f64> = chart.bucket(Style::Circle).iter().map(|p| p.frequency).collect();
        assert_eq!(freqs, vec![500.0, 1000.0, 2000.0]);
    }

    #[test]
    fn remove_and_clear() {
        let mut chart = Chart::new();
        let p = point(250.0, 10.0, Style::A);
        let id = p.id.clone();
        chart.insert_sorted(p);
        chart.insert_sorted(point(4000.0, 50.0, Style::Circle));
        assert_eq!(chart.remove(&id).map(|p| p.frequency), Some(250.0));
        assert!(chart.remove(&id).is_none());
        assert_eq!(chart.len(), 1);
        chart.clear();
        assert!(chart.is_empty());
    }

    #[test]
    fn replace_all_sorts_loaded_points() {
        let mut chart = Chart::new();
        chart.insert_sorted(point(125.0, 0.0, Style::Circle));
        chart.replace_all(vec![
            point(8000.0, 70.0, Style::Circle),
            point(250.0, 10.0, Style::Circle),
        ]);
        let freqs: Vec<f64> = chart.bucket(Style::Circle).iter().map(|p| p.frequency).collect();
        assert_eq!(freqs, vec![250.0, 8000.0]);
    }
}
