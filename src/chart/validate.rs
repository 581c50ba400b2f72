use super::grid::{ENTRY_DECIBEL_MAX, ENTRY_DECIBEL_MIN, ENTRY_FREQUENCY_MAX, ENTRY_FREQUENCY_MIN};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    #[error("frequency {0} Hz is outside 0 to 8000 Hz")]
    FrequencyOutOfRange(f64),
    #[error("level {0} dB is outside -10 to 120 dB")]
    DecibelsOutOfRange(f64),
    #[error("click position ({0}, {1}) is not a finite canvas coordinate")]
    NonFinitePixel(f64, f64),
}

/// Parse a typed (frequency, decibels) entry and check it against the
/// accepted ranges.
pub fn parse_entry(frequency: &str, decibels: &str) -> Result<(f64, f64), ValidationError> {
    let frequency = parse_number(frequency)?;
    let decibels = parse_number(decibels)?;

    if !(ENTRY_FREQUENCY_MIN..=ENTRY_FREQUENCY_MAX).contains(&frequency) {
        return Err(ValidationError::FrequencyOutOfRange(frequency));
    }
    if !(ENTRY_DECIBEL_MIN..=ENTRY_DECIBEL_MAX).contains(&decibels) {
        return Err(ValidationError::DecibelsOutOfRange(decibels));
    }

    Ok((frequency, decibels))
}

/// Reject a click position that cannot map onto the chart.
pub fn check_pixel(x: f64, y: f64) -> Result<(f64, f64), ValidationError> {
    if x.is_finite() && y.is_finite() {
        Ok((x, y))
    } else {
        Err(ValidationError::NonFinitePixel(x, y))
    }
}

fn parse_number(text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::NotNumeric(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_values_in_range() {
        assert_eq!(parse_entry("1000", "20"), Ok((1000.0, 20.0)));
        assert_eq!(parse_entry(" 8000 ", "-10"), Ok((8000.0, -10.0)));
        assert_eq!(parse_entry("0", "120"), Ok((0.0, 120.0)));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(
            parse_entry("abc", "20"),
            Err(ValidationError::NotNumeric("abc".into()))
        );
        assert_eq!(
            parse_entry("1000", "NaN"),
            Err(ValidationError::NotNumeric("NaN".into()))
        );
        assert!(parse_entry("", "20").is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            parse_entry("9000", "20"),
            Err(ValidationError::FrequencyOutOfRange(9000.0))
        );
        assert_eq!(
            parse_entry("-1", "20"),
            Err(ValidationError::FrequencyOutOfRange(-1.0))
        );
        assert_eq!(
            parse_entry("1000", "130"),
            Err(ValidationError::DecibelsOutOfRange(130.0))
        );
        assert_eq!(
            parse_entry("1000", "-20"),
            Err(ValidationError::DecibelsOutOfRange(-20.0))
        );
    }

    #[test]
    fn click_must_be_finite() {
        assert_eq!(check_pixel(400.0, 120.0), Ok((400.0, 120.0)));
        assert!(matches!(
            check_pixel(f64::NAN, 100.0),
            Err(ValidationError::NonFinitePixel(..))
        ));
        assert!(check_pixel(10.0, f64::INFINITY).is_err());
    }
}
