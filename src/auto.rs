// Autonomous "drive until done" controller
//
// Two states: Driving until the stop condition is met, then Stopped for the
// rest of the run. The stop command is re-sent every tick so a single lost
// command cannot leave the robot moving.
//
// The caller resets the odometer before starting a distance run; otherwise
// any residual distance counts toward the target.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{AutonomousConfig, AutonomousStrategy};
use crate::messages::DriveCommand;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Driving,
    Stopped,
}

/// When a run is done
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// Average odometer distance has reached the target (inches)
    Distance(f64),
    /// Time since the run started has reached the target
    Elapsed(Duration),
}

impl StopCondition {
    /// A non-finite or negative duration is treated as zero
    pub fn from_strategy(strategy: AutonomousStrategy) -> Self {
        match strategy {
            AutonomousStrategy::Distance { inches } => StopCondition::Distance(inches),
            AutonomousStrategy::Time { seconds } => StopCondition::Elapsed(
                Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO),
            ),
        }
    }

    fn is_met(&self, progress: Progress) -> bool {
        match *self {
            // A NaN target counts as met
            StopCondition::Distance(target) => {
                !(target > 0.0) || progress.distance_inch >= target
            }
            StopCondition::Elapsed(target) => progress.elapsed >= target,
        }
    }
}

/// Per-tick view of how far the run has got
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    pub distance_inch: f64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct AutonomousController {
    condition: StopCondition,
    forward_speed: f64,
    started_at: Duration,
    state: RunState,
}

impl AutonomousController {
    /// Start a run at clock time `now`
    pub fn start(condition: StopCondition, forward_speed: f64, now: Duration) -> Self {
        info!("Autonomous run started: {:?} at speed {}", condition, forward_speed);
        Self {
            condition,
            forward_speed,
            started_at: now,
            state: RunState::Driving,
        }
    }

    pub fn from_config(config: &AutonomousConfig, now: Duration) -> Self {
        Self::start(
            StopCondition::from_strategy(config.strategy),
            config.forward_speed,
            now,
        )
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Advance one tick given the current odometer average and clock time
    pub fn tick(&mut self, distance_inch: f64, now: Duration) -> DriveCommand {
        let progress = Progress {
            distance_inch,
            elapsed: now.saturating_sub(self.started_at),
        };

        if self.state == RunState::Driving && self.condition.is_met(progress) {
            info!(
                "Autonomous target reached: {:.2} in after {:.2} s",
                progress.distance_inch,
                progress.elapsed.as_secs_f64()
            );
            self.state = RunState::Stopped;
        }

        match self.state {
            RunState::Driving => DriveCommand::new(self.forward_speed, 0.0),
            RunState::Stopped => DriveCommand::stop(),
        }
    }
}
