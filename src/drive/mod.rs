// Drivetrain module for the two-wheel differential base
//
// Provides:
// - Encoder pulse -> inch conversion
// - Per-wheel pulse counting and straight-line odometry
// - Arcade-drive mixing and operator axis scaling
// - Drivetrain wrapper around the motor output

mod driver;
pub mod encoder;
pub mod mixer;
pub mod odometry;
pub mod teleop;
pub mod units;

pub use driver::Drivetrain;
pub use encoder::EncoderChannel;
pub use mixer::{arcade, DriveMixer, MirroredSide};
pub use odometry::{EncoderSample, Odometer, OdometrySnapshot};
pub use teleop::{AxisReading, TeleopMixer};
pub use units::{distance_per_pulse, CalibrationError};
