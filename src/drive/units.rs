// Encoder pulse -> wheel distance conversion

use std::f64::consts::PI;

/// Error types for drivetrain calibration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    #[error("Invalid configuration: {parameter} must be positive, got {value}")]
    InvalidConfiguration { parameter: &'static str, value: f64 },
}

fn require_positive(parameter: &'static str, value: f64) -> Result<f64, CalibrationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalibrationError::InvalidConfiguration { parameter, value })
    }
}

/// Compute inches of wheel travel per encoder pulse
///
/// # Arguments
/// * `gear_stages` - Reduction ratio of each stage between motor shaft and wheel
/// * `pulses_per_motor_rev` - Encoder pulses per motor shaft revolution
/// * `wheel_diameter_inch` - Wheel diameter in inches
///
/// An empty `gear_stages` slice means the encoder sits on the wheel axle.
pub fn distance_per_pulse(
    gear_stages: &[f64],
    pulses_per_motor_rev: f64,
    wheel_diameter_inch: f64,
) -> Result<f64, CalibrationError> {
    let mut gear_ratio = 1.0;
    for &stage in gear_stages {
        gear_ratio *= require_positive("gear stage", stage)?;
    }
    let pulses_per_motor_rev = require_positive("pulses per motor revolution", pulses_per_motor_rev)?;
    let wheel_diameter_inch = require_positive("wheel diameter", wheel_diameter_inch)?;

    let pulses_per_wheel_rev = pulses_per_motor_rev * gear_ratio;
    Ok((PI * wheel_diameter_inch) / pulses_per_wheel_rev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GEAR_STAGES, PULSES_PER_MOTOR_REV, WHEEL_DIAMETER_INCH};

    #[test]
    fn test_xrp_calibration() {
        let dpp = distance_per_pulse(&GEAR_STAGES, PULSES_PER_MOTOR_REV, WHEEL_DIAMETER_INCH)
            .unwrap();
        // Circumference 7.4210 in over 585 pulses per wheel revolution
        assert!((dpp - 0.012686).abs() < 1e-5, "got {}", dpp);
    }

    #[test]
    fn test_gear_ratio_product() {
        let ratio: f64 = GEAR_STAGES.iter().product();
        assert!((ratio - 48.75).abs() < 1e-9);
    }

    #[test]
    fn test_direct_drive() {
        let dpp = distance_per_pulse(&[], 1.0, 1.0).unwrap();
        assert!((dpp - PI).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_factors() {
        assert_eq!(
            distance_per_pulse(&[2.0, 0.0], 12.0, 2.0),
            Err(CalibrationError::InvalidConfiguration {
                parameter: "gear stage",
                value: 0.0
            })
        );
        assert!(distance_per_pulse(&GEAR_STAGES, -12.0, 2.0).is_err());
        assert!(distance_per_pulse(&GEAR_STAGES, 12.0, 0.0).is_err());
        assert!(distance_per_pulse(&GEAR_STAGES, 12.0, f64::NAN).is_err());
    }
}
