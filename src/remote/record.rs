use serde::{Deserialize, Serialize};

use crate::chart::point::{DataPoint, Ear, Style};

/// A point as stored by the persistence service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: String,
    pub ear: Ear,
    pub frequency: f64,
    pub decibels: f64,
    pub style: Style,
}

impl PointRecord {
    pub fn from_point(ear: Ear, point: &DataPoint) -> Self {
        Self {
            id: point.id.clone(),
            ear,
            frequency: point.frequency,
            decibels: point.decibels,
            style: point.style,
        }
    }

    pub fn into_point(self) -> DataPoint {
        DataPoint {
            frequency: self.frequency,
            decibels: self.decibels,
            id: self.id,
            style: self.style,
        }
    }
}
