// Drivetrain: mixer + motor output
//
// Combines the arcade mixer with an injected motor output to give the modes
// a single "drive this command" call.

use tracing::{debug, info, warn};

use super::mixer::DriveMixer;
use crate::hal::{MotorOutput, OutputError};
use crate::messages::{DriveCommand, WheelPowers};

pub struct Drivetrain {
    output: Box<dyn MotorOutput>,
    mixer: DriveMixer,
    last_powers: WheelPowers,
}

impl Drivetrain {
    pub fn new(output: Box<dyn MotorOutput>, mixer: DriveMixer) -> Self {
        Self {
            output,
            mixer,
            last_powers: WheelPowers::zero(),
        }
    }

    /// Mix a command and send it to the motors
    ///
    /// On output failure the computed powers are still available from
    /// [`Drivetrain::last_powers`].
    pub fn drive(&mut self, command: DriveCommand) -> Result<WheelPowers, OutputError> {
        let powers = self.mixer.mix(command);
        self.send(powers)?;
        Ok(powers)
    }

    /// Command zero power on both sides
    pub fn stop(&mut self) -> Result<(), OutputError> {
        self.send(WheelPowers::zero())
    }

    fn send(&mut self, powers: WheelPowers) -> Result<(), OutputError> {
        debug!(
            "Setting wheel powers: left={:.3}, right={:.3}",
            powers.left, powers.right
        );
        self.last_powers = powers;
        self.output.set_powers(powers)
    }

    /// Powers from the most recent command
    pub fn last_powers(&self) -> WheelPowers {
        self.last_powers
    }
}

impl Drop for Drivetrain {
    fn drop(&mut self) {
        // Leave the motors stopped
        info!("Stopping drivetrain");
        if let Err(e) = self.stop() {
            warn!("Failed to stop motors on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::mixer::MirroredSide;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Arc<Mutex<Vec<WheelPowers>>>,
    }

    impl MotorOutput for Recorder {
        fn set_powers(&mut self, powers: WheelPowers) -> Result<(), OutputError> {
            self.sent.lock().unwrap().push(powers);
            Ok(())
        }
    }

    struct Unplugged;

    impl MotorOutput for Unplugged {
        fn set_powers(&mut self, _powers: WheelPowers) -> Result<(), OutputError> {
            Err(OutputError::Disconnected)
        }
    }

    #[test]
    fn test_drive_applies_mirror() {
        let recorder = Recorder::default();
        let mut drivetrain =
            Drivetrain::new(Box::new(recorder.clone()), DriveMixer::new(MirroredSide::Right));

        let powers = drivetrain.drive(DriveCommand::new(0.5, 0.0)).unwrap();
        assert_eq!(powers, WheelPowers::new(0.5, -0.5));
        assert_eq!(recorder.sent.lock().unwrap().as_slice(), &[powers]);
    }

    #[test]
    fn test_drop_stops_motors() {
        let recorder = Recorder::default();
        {
            let mut drivetrain =
                Drivetrain::new(Box::new(recorder.clone()), DriveMixer::default());
            drivetrain.drive(DriveCommand::new(1.0, 0.0)).unwrap();
        }
        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].is_zero(), "last command should be a stop");
    }

    #[test]
    fn test_output_failure_is_reported() {
        let mut drivetrain = Drivetrain::new(Box::new(Unplugged), DriveMixer::default());
        let err = drivetrain.drive(DriveCommand::new(0.5, 0.0)).unwrap_err();
        assert!(matches!(err, OutputError::Disconnected));
        assert_eq!(drivetrain.last_powers().left, 0.5);
    }
}
