// Arcade-drive kinematics for the two-wheel differential base
// Converts a (speed, rotation) command into left/right motor power fractions.

use serde::{Deserialize, Serialize};

use crate::messages::{DriveCommand, WheelPowers};

/// Maximum power fraction on either side
const MAX_POWER: f64 = 1.0;

/// Side whose motor is mounted mirrored and needs its power negated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MirroredSide {
    None,
    Left,
    #[default]
    Right,
}

/// Clamp to [-MAX_POWER, MAX_POWER]. NaN maps to zero power.
fn clamp_power(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-MAX_POWER, MAX_POWER)
    }
}

/// Mix a command into wheel powers, before any mirror inversion
///
/// Positive rotation turns clockwise: the left wheel speeds up and the
/// right wheel slows down.
pub fn arcade(command: DriveCommand) -> WheelPowers {
    let speed = clamp_power(command.speed);
    let rotation = clamp_power(command.rotation);

    WheelPowers {
        left: clamp_power(speed + rotation),
        right: clamp_power(speed - rotation),
    }
}

/// Arcade mixer with the robot's fixed mirror configuration.
///
/// This is the only place the mirrored motor's sign is flipped; the motor
/// output must not invert it again.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriveMixer {
    mirrored: MirroredSide,
}

impl DriveMixer {
    pub fn new(mirrored: MirroredSide) -> Self {
        Self { mirrored }
    }

    /// Mix a command into the powers sent to the motors
    pub fn mix(&self, command: DriveCommand) -> WheelPowers {
        let powers = arcade(command);
        match self.mirrored {
            MirroredSide::None => powers,
            MirroredSide::Left => WheelPowers::new(-powers.left, powers.right),
            MirroredSide::Right => WheelPowers::new(powers.left, -powers.right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> impl Iterator<Item = (f64, f64)> {
        let steps: Vec<f64> = (-10..=10).map(|i| i as f64 / 10.0).collect();
        let steps_inner = steps.clone();
        steps
            .into_iter()
            .flat_map(move |s| steps_inner.clone().into_iter().map(move |r| (s, r)))
    }

    #[test]
    fn test_zero_command() {
        let powers = arcade(DriveCommand::stop());
        assert!(powers.is_zero());
    }

    #[test]
    fn test_forward_motion() {
        let powers = arcade(DriveCommand::new(0.7, 0.0));
        assert_eq!(powers, WheelPowers::new(0.7, 0.7));
    }

    #[test]
    fn test_rotation_only() {
        // Spin in place: wheels run in opposite directions
        let powers = arcade(DriveCommand::new(0.0, 0.4));
        assert_eq!(powers, WheelPowers::new(0.4, -0.4));
    }

    #[test]
    fn test_outputs_stay_in_unit_range() {
        for (speed, rotation) in grid() {
            let powers = arcade(DriveCommand::new(speed, rotation));
            assert!(
                powers.left.abs() <= 1.0 && powers.right.abs() <= 1.0,
                "({}, {}) -> {:?}",
                speed,
                rotation,
                powers
            );
        }
    }

    #[test]
    fn test_turn_direction_follows_rotation_sign() {
        for (speed, rotation) in grid() {
            if rotation == 0.0 {
                continue;
            }
            let powers = arcade(DriveCommand::new(speed, rotation));
            let diff = powers.left - powers.right;
            assert_eq!(
                diff.signum(),
                rotation.signum(),
                "({}, {}) -> {:?}",
                speed,
                rotation,
                powers
            );
        }
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        let powers = arcade(DriveCommand::new(3.0, -5.0));
        assert_eq!(powers, WheelPowers::new(0.0, 1.0));

        let powers = arcade(DriveCommand::new(f64::NAN, 0.5));
        assert_eq!(powers, WheelPowers::new(0.5, -0.5));
    }

    #[test]
    fn test_mirror_inversion_applied_once() {
        let command = DriveCommand::new(0.7, 0.0);
        assert_eq!(
            DriveMixer::new(MirroredSide::Right).mix(command),
            WheelPowers::new(0.7, -0.7)
        );
        assert_eq!(
            DriveMixer::new(MirroredSide::Left).mix(command),
            WheelPowers::new(-0.7, 0.7)
        );
        assert_eq!(
            DriveMixer::new(MirroredSide::None).mix(command),
            WheelPowers::new(0.7, 0.7)
        );
    }
}
