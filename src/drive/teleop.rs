// Operator stick axes -> drive command

use crate::config::TeleopConfig;
use crate::messages::DriveCommand;

/// Raw readings of the two operator axes, nominally in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisReading {
    /// Forward stick; pushed away from the operator reads negative
    pub forward: f64,
    pub turn: f64,
}

impl AxisReading {
    pub const fn new(forward: f64, turn: f64) -> Self {
        Self { forward, turn }
    }
}

/// Stateless per-tick mapping from operator axes to a [`DriveCommand`].
///
/// Both axes are negated to match the gamepad convention (stick up and stick
/// left read negative). Range is not enforced here; the mixer clamps.
#[derive(Debug, Clone, Copy)]
pub struct TeleopMixer {
    forward_scale: f64,
    turn_scale: f64,
    deadband: f64,
}

impl Default for TeleopMixer {
    fn default() -> Self {
        Self::from_config(&TeleopConfig::default())
    }
}

impl TeleopMixer {
    pub fn new(forward_scale: f64, turn_scale: f64) -> Self {
        Self {
            forward_scale,
            turn_scale,
            deadband: 0.0,
        }
    }

    pub fn from_config(config: &TeleopConfig) -> Self {
        Self::new(config.forward_scale, config.turn_scale).with_deadband(config.deadband)
    }

    /// Readings with magnitude below `deadband` are treated as centered
    pub fn with_deadband(mut self, deadband: f64) -> Self {
        self.deadband = deadband.abs();
        self
    }

    fn apply_deadband(&self, value: f64) -> f64 {
        if value.abs() < self.deadband { 0.0 } else { value }
    }

    pub fn compute(&self, axes: AxisReading) -> DriveCommand {
        DriveCommand {
            speed: -self.apply_deadband(axes.forward) * self.forward_scale,
            rotation: -self.apply_deadband(axes.turn) * self.turn_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::mixer::arcade;
    use crate::messages::WheelPowers;

    #[test]
    fn test_full_forward_stick() {
        let command = TeleopMixer::default().compute(AxisReading::new(-1.0, 0.0));
        assert_eq!(command, DriveCommand::new(0.7, 0.0));
        assert_eq!(arcade(command), WheelPowers::new(0.7, 0.7));
    }

    #[test]
    fn test_turn_scaling_and_sign() {
        let command = TeleopMixer::default().compute(AxisReading::new(0.0, 1.0));
        assert_eq!(command, DriveCommand::new(0.0, -0.5));
    }

    #[test]
    fn test_deadband_zeroes_small_readings() {
        let teleop = TeleopMixer::new(1.0, 1.0).with_deadband(0.05);
        let command = teleop.compute(AxisReading::new(0.03, -0.04));
        assert_eq!(command.speed, 0.0);
        assert_eq!(command.rotation, 0.0);

        let command = teleop.compute(AxisReading::new(0.5, 0.0));
        assert_eq!(command.speed, -0.5);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        // Clamping is left to the mixer
        let command = TeleopMixer::new(1.0, 1.0).compute(AxisReading::new(-1.5, 0.0));
        assert_eq!(command.speed, 1.5);
        assert_eq!(arcade(command), WheelPowers::new(1.0, 1.0));
    }
}
