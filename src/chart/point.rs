use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three independent audiogram charts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ear {
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
    /// Free-field (loudspeaker) measurement.
    #[serde(rename = "champLibre")]
    ChampLibre,
}

impl Ear {
    /// Path segment used by the persistence service.
    pub fn as_str(self) -> &'static str {
        match self {
            Ear::Left => "left",
            Ear::Right => "right",
            Ear::ChampLibre => "champLibre",
        }
    }
}

impl fmt::Display for Ear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for Ear {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Ear::Left),
            "right" => Ok(Ear::Right),
            "champLibre" | "champlibre" | "free-field" => Ok(Ear::ChampLibre),
            _ => Err(ParseLabelError {
                kind: "ear",
                value: s.to_string(),
                expected: "left, right, champLibre",
            }),
        }
    }
}

/// Marker drawn for a point: the assistive-device condition of the test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Style {
    /// Unaided.
    #[serde(rename = "circle")]
    Circle,
    /// Hearing aid.
    A,
    /// Implant.
    I,
    /// Hearing aid and implant.
    AI,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Circle => "circle",
            Style::A => "A",
            Style::I => "I",
            Style::AI => "AI",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" | "o" => Ok(Style::Circle),
            "A" | "a" => Ok(Style::A),
            "I" | "i" => Ok(Style::I),
            "AI" | "ai" => Ok(Style::AI),
            _ => Err(ParseLabelError {
                kind: "style",
                value: s.to_string(),
                expected: "circle, A, I, AI",
            }),
        }
    }
}

/// A threshold measurement plotted on an audiogram.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub frequency: f64,
    pub decibels: f64,
    pub id: String,
    pub style: Style,
}

impl DataPoint {
    /// New point with a freshly generated id.
    pub fn new(frequency: f64, decibels: f64, style: Style) -> Self {
        Self {
            frequency,
            decibels,
            id: uuid::Uuid::new_v4().to_string(),
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ear_round_trips_through_text() {
        for ear in [Ear::Left, Ear::Right, Ear::ChampLibre] {
            assert_eq!(ear.as_str().parse::<Ear>().unwrap(), ear);
        }
        assert!("middle".parse::<Ear>().is_err());
    }

    #[test]
    fn style_serializes_with_wire_names() {
        assert_eq!(serde_json::to_string(&Style::Circle).unwrap(), "\"circle\"");
        assert_eq!(serde_json::to_string(&Style::AI).unwrap(), "\"AI\"");
        assert_eq!(serde_json::to_string(&Ear::ChampLibre).unwrap(), "\"champLibre\"");
    }

    #[test]
    fn new_points_get_distinct_ids() {
        let a = DataPoint::new(1000.0, 20.0, Style::Circle);
        let b = DataPoint::new(1000.0, 20.0, Style::Circle);
        assert_ne!(a.id, b.id);
    }
}
