//! Unit conversion
//!
//! Converts raw height and weight text into meters and kilograms.
//! - Centimeters and feet+inches for height
//! - Kilograms and pounds for weight
//! - Unusable input yields `None` rather than an error

use crate::types::{HeightUnit, WeightUnit};

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;

/// Kilograms per pound
pub const KILOGRAMS_PER_POUND: f64 = 0.453592;

const INCHES_PER_FOOT: f64 = 12.0;
const CENTIMETERS_PER_METER: f64 = 100.0;

/// Parse a field into a finite number.
///
/// Surrounding whitespace is ignored. Empty text, non-numeric text and
/// values such as `inf` or `NaN` are treated as missing.
pub fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Convert a height entry to meters.
///
/// For [`HeightUnit::Centimeters`] only `raw` is read. For
/// [`HeightUnit::FeetInches`], `raw` holds feet and `secondary` holds inches;
/// inches default to 0 when absent or unparsable.
///
/// Returns `None` unless the result is a strictly positive length.
pub fn convert_height_to_meters(
    raw: &str,
    unit: HeightUnit,
    secondary: Option<&str>,
) -> Option<f64> {
    let meters = match unit {
        HeightUnit::Centimeters => {
            let cm = parse_finite(raw).filter(|cm| *cm > 0.0)?;
            cm / CENTIMETERS_PER_METER
        }
        HeightUnit::FeetInches => {
            let feet = parse_finite(raw).filter(|feet| *feet >= 0.0)?;
            let inches = secondary.and_then(parse_finite).unwrap_or(0.0);
            (feet * INCHES_PER_FOOT + inches) * METERS_PER_INCH
        }
    };

    (meters.is_finite() && meters > 0.0).then_some(meters)
}

/// Convert a weight entry to kilograms.
///
/// Returns `None` when the parsed value is not finite or not positive.
pub fn convert_weight_to_kilograms(raw: &str, unit: WeightUnit) -> Option<f64> {
    let value = parse_finite(raw)?;
    let kilograms = match unit {
        WeightUnit::Kilograms => value,
        WeightUnit::Pounds => value * KILOGRAMS_PER_POUND,
    };

    (kilograms.is_finite() && kilograms > 0.0).then_some(kilograms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centimeters_to_meters() {
        let meters = convert_height_to_meters("170", HeightUnit::Centimeters, None).unwrap();
        assert!((meters - 1.70).abs() < 1e-12);

        // Secondary value is ignored for centimeters
        let meters =
            convert_height_to_meters(" 182.5 ", HeightUnit::Centimeters, Some("7")).unwrap();
        assert!((meters - 1.825).abs() < 1e-12);
    }

    #[test]
    fn test_feet_and_inches_to_meters() {
        let meters = convert_height_to_meters("5", HeightUnit::FeetInches, Some("9")).unwrap();
        assert!((meters - 1.7526).abs() < 1e-9);

        let meters = convert_height_to_meters("5", HeightUnit::FeetInches, Some("10")).unwrap();
        assert!((meters - 1.778).abs() < 1e-9);
    }

    #[test]
    fn test_inches_default_to_zero() {
        let expected = 6.0 * 0.3048;

        let absent = convert_height_to_meters("6", HeightUnit::FeetInches, None).unwrap();
        assert!((absent - expected).abs() < 1e-9);

        let unparsable =
            convert_height_to_meters("6", HeightUnit::FeetInches, Some("abc")).unwrap();
        assert!((unparsable - expected).abs() < 1e-9);

        let empty = convert_height_to_meters("6", HeightUnit::FeetInches, Some("")).unwrap();
        assert!((empty - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_feet_with_inches() {
        let meters = convert_height_to_meters("0", HeightUnit::FeetInches, Some("30")).unwrap();
        assert!((meters - 0.762).abs() < 1e-9);

        assert_eq!(
            convert_height_to_meters("0", HeightUnit::FeetInches, Some("0")),
            None
        );
        assert_eq!(convert_height_to_meters("0", HeightUnit::FeetInches, None), None);
    }

    #[test]
    fn test_invalid_height_is_absent() {
        for raw in ["", "0", "-5", "abc", "inf", "NaN", "   "] {
            assert_eq!(
                convert_height_to_meters(raw, HeightUnit::Centimeters, None),
                None,
                "height {raw:?} in cm"
            );
        }

        for raw in ["", "-5", "abc", "inf"] {
            assert_eq!(
                convert_height_to_meters(raw, HeightUnit::FeetInches, Some("6")),
                None,
                "height {raw:?} in ft"
            );
        }

        // Negative inches that outweigh the feet leave no positive height
        assert_eq!(
            convert_height_to_meters("1", HeightUnit::FeetInches, Some("-20")),
            None
        );
    }

    #[test]
    fn test_weight_conversion() {
        assert_eq!(
            convert_weight_to_kilograms("70", WeightUnit::Kilograms),
            Some(70.0)
        );

        let kg = convert_weight_to_kilograms("250", WeightUnit::Pounds).unwrap();
        assert!((kg - 113.398).abs() < 1e-9);
    }

    #[test]
    fn test_pounds_round_trip() {
        let kg = convert_weight_to_kilograms("100", WeightUnit::Pounds).unwrap();
        let pounds = kg / KILOGRAMS_PER_POUND;
        assert!((pounds - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_weight_is_absent() {
        for unit in [WeightUnit::Kilograms, WeightUnit::Pounds] {
            for raw in ["", "0", "-5", "heavy", "-inf"] {
                assert_eq!(
                    convert_weight_to_kilograms(raw, unit),
                    None,
                    "weight {raw:?} in {unit}"
                );
            }
        }
    }
}
