// Message types passed between the control modes, the mixer and the motors

use serde::{Deserialize, Serialize};

// (speed, rotation) pair produced by the active mode every tick
// Normalized power fractions, not physical units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct DriveCommand {
    pub speed: f64,
    pub rotation: f64,
}

impl DriveCommand {
    pub const fn new(speed: f64, rotation: f64) -> Self {
        Self { speed, rotation }
    }

    pub const fn stop() -> Self {
        Self::new(0.0, 0.0)
    }
}

// Mixer output, handed straight to the motor output
// Has default values because the fail-safe output is zero power
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct WheelPowers {
    pub left: f64,
    pub right: f64,
}

impl WheelPowers {
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

/// Robot operating mode, switched by the scheduler
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Disabled,
    Autonomous,
    Teleop,
}

/// Health status reported with every tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    InputStale,
    Faulted,
}
