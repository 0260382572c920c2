// Hardware collaborator interfaces
//
// The control core never touches hardware directly. Motors, encoders, the
// operator gamepad and the clock are injected through these traits, so the
// same runtime drives real hardware or the simulator in `sim`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::drive::odometry::EncoderSample;
use crate::drive::teleop::AxisReading;
use crate::messages::WheelPowers;

/// Error types for the motor output
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Motor output disconnected")]
    Disconnected,

    #[error("Motor output rejected command: {reason}")]
    Rejected { reason: String },
}

/// Accepts wheel powers, always within [-1, 1]
pub trait MotorOutput: Send {
    fn set_powers(&mut self, powers: WheelPowers) -> Result<(), OutputError>;
}

/// Supplies one encoder sample per tick
pub trait EncoderInput: Send {
    fn sample(&mut self) -> EncoderSample;
}

/// Supplies the operator axes. `None` means no fresh reading this tick
/// (e.g. gamepad unplugged).
pub trait OperatorInput: Send {
    fn read_axes(&mut self) -> Option<AxisReading>;
}

/// Monotonic time since an arbitrary fixed origin
pub trait Clock: Send {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced by hand, for tests and the simulator.
/// Cloning shares the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: std::sync::Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.micros
            .fetch_add(by.as_micros() as u64, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::Acquire))
    }
}
