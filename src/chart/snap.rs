/// Snap a raw frequency onto the clinical grid.
///
/// Values at or beyond either end clamp to that end. Between two adjacent
/// grid values the lower half snaps to the lower value and the upper half
/// snaps to the midpoint itself, so a click between 1000 and 2000 Hz lands
/// on either 1000 or 1500. A value sitting exactly on a midpoint or a grid
/// value is returned unchanged. NaN snaps to the first grid value.
pub fn snap_frequency(raw: f64, standard: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (standard.first(), standard.last()) else {
        return raw;
    };
    if raw.is_nan() || raw <= first {
        return first;
    }
    if raw >= last {
        return last;
    }

    for pair in standard.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        let midpoint = (lower + upper) / 2.0;
        if raw > lower && raw < midpoint {
            return lower;
        }
        if raw > midpoint && raw < upper {
            return midpoint;
        }
        if raw == midpoint {
            return raw;
        }
    }

    raw
}

/// Snap a raw hearing level to the nearest grid level. Ties keep the lower
/// level.
pub fn snap_decibel(raw: f64, levels: &[f64]) -> f64 {
    let mut best = match levels.first() {
        Some(&level) => level,
        None => return raw,
    };
    let mut best_distance = (raw - best).abs();

    for &level in &levels[1..] {
        let distance = (raw - level).abs();
        if distance < best_distance {
            best = level;
            best_distance = distance;
        }
    }

    best
}
