// Simulated drivetrain hardware
//
// A plant shared by a simulated motor output and encoder input. Each encoder
// sample advances the wheels by one tick at the last commanded power. The
// mirrored motor is mounted flipped, so the plant negates its power back
// before turning it into wheel travel.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::drive::mixer::MirroredSide;
use crate::drive::odometry::EncoderSample;
use crate::drive::teleop::AxisReading;
use crate::hal::{EncoderInput, MotorOutput, OperatorInput, OutputError};
use crate::messages::WheelPowers;

/// Encoder pulses per tick at full power (1000 pulses/s at 50 Hz)
pub const DEFAULT_PULSES_PER_TICK: f64 = 20.0;

#[derive(Debug, Default)]
struct PlantState {
    powers: WheelPowers,
    // Fractional pulses carried between ticks
    left_travel: f64,
    right_travel: f64,
    left_count: i64,
    right_count: i64,
}

#[derive(Debug)]
pub struct SimPlant {
    mirrored: MirroredSide,
    pulses_per_tick: f64,
    state: Mutex<PlantState>,
}

impl SimPlant {
    pub fn new(mirrored: MirroredSide, pulses_per_tick: f64) -> Arc<Self> {
        Arc::new(Self {
            mirrored,
            pulses_per_tick,
            state: Mutex::new(PlantState::default()),
        })
    }

    fn state(&self) -> MutexGuard<'_, PlantState> {
        // A panic while holding the lock cannot leave the counters inconsistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Powers as last written by the motor output
    pub fn powers(&self) -> WheelPowers {
        self.state().powers
    }

    /// Total pulses counted on each side since creation
    pub fn counts(&self) -> (i64, i64) {
        let state = self.state();
        (state.left_count, state.right_count)
    }

    /// Wheel directions with the mounting flip undone
    fn wheel_powers(&self, powers: WheelPowers) -> (f64, f64) {
        match self.mirrored {
            MirroredSide::None => (powers.left, powers.right),
            MirroredSide::Left => (-powers.left, powers.right),
            MirroredSide::Right => (powers.left, -powers.right),
        }
    }

    fn step(&self) -> (i64, i64) {
        let mut state = self.state();
        let (left, right) = self.wheel_powers(state.powers);

        state.left_travel += left * self.pulses_per_tick;
        state.right_travel += right * self.pulses_per_tick;

        let left_pulses = state.left_travel.trunc();
        let right_pulses = state.right_travel.trunc();
        state.left_travel -= left_pulses;
        state.right_travel -= right_pulses;

        let delta = (left_pulses as i64, right_pulses as i64);
        state.left_count += delta.0;
        state.right_count += delta.1;
        delta
    }
}

pub struct SimMotors(pub Arc<SimPlant>);

impl MotorOutput for SimMotors {
    fn set_powers(&mut self, powers: WheelPowers) -> Result<(), OutputError> {
        if powers.left.abs() > 1.0 || powers.right.abs() > 1.0 {
            return Err(OutputError::Rejected {
                reason: format!("{:?} outside [-1, 1]", powers),
            });
        }
        self.0.state().powers = powers;
        Ok(())
    }
}

/// Reports pulse deltas, one step of travel per sample
pub struct SimEncoders(pub Arc<SimPlant>);

impl EncoderInput for SimEncoders {
    fn sample(&mut self) -> EncoderSample {
        let (left, right) = self.0.step();
        EncoderSample::Delta { left, right }
    }
}

/// Reports the raw running counters, like hardware that never resets
pub struct SimCumulativeEncoders(pub Arc<SimPlant>);

impl EncoderInput for SimCumulativeEncoders {
    fn sample(&mut self) -> EncoderSample {
        self.0.step();
        let (left, right) = self.0.counts();
        EncoderSample::Cumulative { left, right }
    }
}

/// Operator holding the sticks in a fixed position
#[derive(Debug, Clone, Copy)]
pub struct FixedAxes(pub Option<AxisReading>);

impl OperatorInput for FixedAxes {
    fn read_axes(&mut self) -> Option<AxisReading> {
        self.0
    }
}

/// Operator input replayed from a script, one entry per tick.
/// After the script ends there are no further readings.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAxes {
    readings: std::collections::VecDeque<Option<AxisReading>>,
}

impl ScriptedAxes {
    pub fn new(readings: impl IntoIterator<Item = Option<AxisReading>>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
        }
    }
}

impl OperatorInput for ScriptedAxes {
    fn read_axes(&mut self) -> Option<AxisReading> {
        self.readings.pop_front().flatten()
    }
}
