/// How data values map onto one pixel axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisScale {
    Linear { min: f64, max: f64 },
    Logarithmic { min: f64, max: f64 },
}

impl AxisScale {
    /// Data value under `pixel`, where `start`/`end` are the pixel
    /// positions of the axis minimum and maximum.
    pub fn value_for_pixel(&self, pixel: f64, start: f64, end: f64) -> f64 {
        let span = end - start;
        let decimal = if span == 0.0 { 0.0 } else { (pixel - start) / span };
        match *self {
            AxisScale::Linear { min, max } => min + decimal * (max - min),
            AxisScale::Logarithmic { min, max } => {
                let (lo, hi) = (min.log10(), max.log10());
                10f64.powf(lo + decimal * (hi - lo))
            }
        }
    }

    pub fn pixel_for_value(&self, value: f64, start: f64, end: f64) -> f64 {
        let decimal = match *self {
            AxisScale::Linear { min, max } => (value - min) / (max - min),
            AxisScale::Logarithmic { min, max } => {
                let (lo, hi) = (min.log10(), max.log10());
                (value.log10() - lo) / (hi - lo)
            }
        };
        start + decimal * (end - start)
    }
}

/// Plot area of the audiogram on the canvas together with its axes.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub frequency: AxisScale,
    pub decibels: AxisScale,
    /// Audiograms draw the best hearing (lowest level) at the top.
    pub reverse_decibels: bool,
}

impl ChartGeometry {
    /// Convert a canvas click into raw (frequency, decibels).
    pub fn pixel_to_data(&self, pixel_x: f64, pixel_y: f64) -> (f64, f64) {
        let frequency = self
            .frequency
            .value_for_pixel(pixel_x, self.left, self.left + self.width);
        let (y_min_px, y_max_px) = self.decibel_pixel_range();
        let decibels = self.decibels.value_for_pixel(pixel_y, y_min_px, y_max_px);
        (frequency, decibels)
    }

    pub fn data_to_pixel(&self, frequency: f64, decibels: f64) -> (f64, f64) {
        let x = self
            .frequency
            .pixel_for_value(frequency, self.left, self.left + self.width);
        let (y_min_px, y_max_px) = self.decibel_pixel_range();
        let y = self.decibels.pixel_for_value(decibels, y_min_px, y_max_px);
        (x, y)
    }

    // Pixel rows of the axis minimum and maximum. Canvas y grows downward.
    fn decibel_pixel_range(&self) -> (f64, f64) {
        let bottom = self.top + self.height;
        if self.reverse_decibels {
            (self.top, bottom)
        } else {
            (bottom, self.top)
        }
    }
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            left: 50.0,
            top: 30.0,
            width: 800.0,
            height: 500.0,
            frequency: AxisScale::Logarithmic { min: 125.0, max: 8000.0 },
            decibels: AxisScale::Linear { min: -10.0, max: 120.0 },
            reverse_decibels: true,
        }
    }
}
