// Loop timing, drivetrain calibration and tuning
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::drive::MirroredSide;

// Runtime loop frequency (20 ms period)
pub const LOOP_HZ: u64 = 50;

// Operator input watchdog
pub const INPUT_TIMEOUT: Duration = Duration::from_millis(250);

// Drivetrain calibration
// Gear reduction stages between motor shaft and wheel (48.75:1 overall)
pub const GEAR_STAGES: [f64; 4] = [30.0 / 14.0, 28.0 / 16.0, 36.0 / 9.0, 26.0 / 8.0];
pub const PULSES_PER_MOTOR_REV: f64 = 12.0;
pub const WHEEL_DIAMETER_INCH: f64 = 2.3622; // 60 mm

// The right motor is mounted flipped
pub const MIRRORED_SIDE: MirroredSide = MirroredSide::Right;

// Autonomous defaults
pub const AUTO_FORWARD_SPEED: f64 = 0.5;
pub const AUTO_TARGET_INCH: f64 = 5.0;

// Teleop scaling
pub const TELEOP_FORWARD_SCALE: f64 = 0.7;
pub const TELEOP_TURN_SCALE: f64 = 0.5;
pub const TELEOP_DEADBAND: f64 = 0.02;

/// Error types for loading and validating a [`RobotConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Which stop condition an autonomous run uses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutonomousStrategy {
    Distance { inches: f64 },
    Time { seconds: f64 },
}

impl Default for AutonomousStrategy {
    fn default() -> Self {
        AutonomousStrategy::Distance {
            inches: AUTO_TARGET_INCH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalibrationConfig {
    pub gear_stages: Vec<f64>,
    pub pulses_per_motor_rev: f64,
    pub wheel_diameter_inch: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            gear_stages: GEAR_STAGES.to_vec(),
            pulses_per_motor_rev: PULSES_PER_MOTOR_REV,
            wheel_diameter_inch: WHEEL_DIAMETER_INCH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeleopConfig {
    pub forward_scale: f64,
    pub turn_scale: f64,
    pub deadband: f64,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            forward_scale: TELEOP_FORWARD_SCALE,
            turn_scale: TELEOP_TURN_SCALE,
            deadband: TELEOP_DEADBAND,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutonomousConfig {
    pub forward_speed: f64,
    pub strategy: AutonomousStrategy,
}

impl Default for AutonomousConfig {
    fn default() -> Self {
        Self {
            forward_speed: AUTO_FORWARD_SPEED,
            strategy: AutonomousStrategy::default(),
        }
    }
}

/// Full robot configuration. Every field falls back to the constants above.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RobotConfig {
    pub loop_hz: u64,
    pub input_timeout_ms: u64,
    pub mirrored_side: MirroredSide,
    pub calibration: CalibrationConfig,
    pub teleop: TeleopConfig,
    pub autonomous: AutonomousConfig,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            loop_hz: LOOP_HZ,
            input_timeout_ms: INPUT_TIMEOUT.as_millis() as u64,
            mirrored_side: MIRRORED_SIDE,
            calibration: CalibrationConfig::default(),
            teleop: TeleopConfig::default(),
            autonomous: AutonomousConfig::default(),
        }
    }
}

impl RobotConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(1000 / self.loop_hz.max(1))
    }

    pub fn input_timeout(&self) -> Duration {
        Duration::from_millis(self.input_timeout_ms)
    }

    /// Check the tunables. Calibration constants are checked separately when
    /// the distance-per-pulse factor is computed, since a bad calibration
    /// must still leave the robot able to hold zero power.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loop_hz == 0 || self.loop_hz > 1000 {
            return Err(ConfigError::InvalidValue {
                field: "loop_hz",
                reason: format!("{} is outside 1..=1000", self.loop_hz),
            });
        }

        let unit_fields = [
            ("autonomous.forward_speed", self.autonomous.forward_speed),
            ("teleop.forward_scale", self.teleop.forward_scale),
            ("teleop.turn_scale", self.teleop.turn_scale),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{} is outside [0, 1]", value),
                });
            }
        }

        if !(0.0..1.0).contains(&self.teleop.deadband) {
            return Err(ConfigError::InvalidValue {
                field: "teleop.deadband",
                reason: format!("{} is outside [0, 1)", self.teleop.deadband),
            });
        }

        let (field, target) = match self.autonomous.strategy {
            AutonomousStrategy::Distance { inches } => ("autonomous.strategy.inches", inches),
            AutonomousStrategy::Time { seconds } => ("autonomous.strategy.seconds", seconds),
        };
        if !target.is_finite() {
            return Err(ConfigError::InvalidValue {
                field,
                reason: format!("{} is not finite", target),
            });
        }

        Ok(())
    }
}
