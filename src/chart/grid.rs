/// Clinical test frequencies (Hz) that clicks and entries snap to.
pub const STANDARD_FREQUENCIES: &[f64] = &[125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0];

/// Denser tick set for the frequency axis, including the inter-octave
/// frequencies.
pub const DISPLAY_FREQUENCIES: &[f64] = &[
    125.0, 250.0, 500.0, 1000.0, 2000.0, 3000.0, 4000.0, 6000.0, 8000.0,
];

/// Hearing level grid, -10 dB to 120 dB in 10 dB steps.
pub const DECIBEL_LEVELS: &[f64] = &[
    -10.0, 0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0,
];

/// Accepted range for a typed frequency entry.
pub const ENTRY_FREQUENCY_MIN: f64 = 0.0;
pub const ENTRY_FREQUENCY_MAX: f64 = 8000.0;

/// Accepted range for a typed hearing level entry.
pub const ENTRY_DECIBEL_MIN: f64 = -10.0;
pub const ENTRY_DECIBEL_MAX: f64 = 120.0;

/// Display domain of the audible band annotation.
pub const BAND_FREQUENCY_MIN: f64 = 125.0;
pub const BAND_FREQUENCY_MAX: f64 = 8000.0;
pub const BAND_INTENSITY_MIN: f64 = 0.0;
pub const BAND_INTENSITY_MAX: f64 = 120.0;

/// Two values closer than this are the same grid position.
pub const MATCH_TOLERANCE: f64 = 0.1;

pub fn same_position(a: f64, b: f64) -> bool {
    // 1000.1 - 1000.0 is slightly above 0.1 in binary floating point
    (a - b).abs() <= MATCH_TOLERANCE + 1e-9
}

/// Short tick label in the usual audiogram notation ("500", "1K", "8K").
pub fn frequency_label(freq: f64) -> String {
    if freq >= 1000.0 {
        let khz = freq / 1000.0;
        if khz.fract() == 0.0 {
            format!("{}K", khz as u32)
        } else {
            format!("{:.1}K", khz)
        }
    } else {
        format!("{}", freq.round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decibel_levels_step_by_ten() {
        assert_eq!(DECIBEL_LEVELS.first(), Some(&-10.0));
        assert_eq!(DECIBEL_LEVELS.last(), Some(&120.0));
        for pair in DECIBEL_LEVELS.windows(2) {
            assert_eq!(pair[1] - pair[0], 10.0);
        }
    }

    #[test]
    fn standard_frequencies_are_subset_of_ticks() {
        for f in STANDARD_FREQUENCIES {
            assert!(DISPLAY_FREQUENCIES.contains(f));
        }
        assert_eq!(DISPLAY_FREQUENCIES.len(), 9);
    }

    #[test]
    fn labels() {
        assert_eq!(frequency_label(125.0), "125");
        assert_eq!(frequency_label(1000.0), "1K");
        assert_eq!(frequency_label(1500.0), "1.5K");
        assert_eq!(frequency_label(8000.0), "8K");
    }

    #[test]
    fn tolerance_is_inclusive() {
        assert!(same_position(1000.0, 1000.1));
        assert!(same_position(1000.0, 999.95));
        assert!(!same_position(1000.0, 1000.2));
    }
}
