// Mode-driven control loop with operator input watchdog
//
// The scheduler calls `enter(mode)` once on a mode change and `tick()` once
// per loop period. `run()` is that scheduler for the simulator: a fixed-rate
// tokio loop.
//
// Note: the watchdog stops the robot if the operator input stops producing
// readings (gamepad unplugged, driver station lagging) instead of replaying
// the last stick position forever.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::auto::{AutonomousController, RunState};
use crate::config::{ConfigError, RobotConfig};
use crate::drive::{
    distance_per_pulse, AxisReading, CalibrationError, DriveMixer, Drivetrain, Odometer,
    OdometrySnapshot, TeleopMixer,
};
use crate::hal::{Clock, EncoderInput, MonotonicClock, MotorOutput, OperatorInput};
use crate::messages::{DriveCommand, Mode, RuntimeHealth, WheelPowers};
use crate::sim::{FixedAxes, SimEncoders, SimMotors, SimPlant, DEFAULT_PULSES_PER_TICK};

/// Injected hardware collaborators
pub struct Hardware {
    pub motors: Box<dyn MotorOutput>,
    pub encoders: Box<dyn EncoderInput>,
    pub operator: Box<dyn OperatorInput>,
    pub clock: Box<dyn Clock>,
}

/// What one tick did
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TickReport {
    pub mode: Mode,
    pub command: DriveCommand,
    pub powers: WheelPowers,
    pub distance_inch: f64,
    pub run_state: Option<RunState>,
    pub health: RuntimeHealth,
}

pub struct Runtime {
    config: RobotConfig,
    drivetrain: Drivetrain,
    encoders: Box<dyn EncoderInput>,
    operator: Box<dyn OperatorInput>,
    clock: Box<dyn Clock>,
    odometer: Result<Odometer, CalibrationError>,
    teleop: TeleopMixer,
    auto: Option<AutonomousController>,
    mode: Mode,
    health: RuntimeHealth,
    latest_axes: Option<AxisReading>,
    axes_received_at: Duration,
}

impl Runtime {
    /// Build the runtime in `Disabled` mode.
    ///
    /// A calibration that cannot produce a distance-per-pulse factor leaves
    /// the runtime `Faulted`: it refuses autonomous and holds zero power.
    pub fn new(config: RobotConfig, hardware: Hardware) -> Self {
        let calibration = &config.calibration;
        let odometer = distance_per_pulse(
            &calibration.gear_stages,
            calibration.pulses_per_motor_rev,
            calibration.wheel_diameter_inch,
        )
        .map(Odometer::new);

        let health = match &odometer {
            Ok(odom) => {
                info!(
                    "Drivetrain calibrated: {:.6} in/pulse",
                    odom.distance_per_pulse()
                );
                RuntimeHealth::Ok
            }
            Err(e) => {
                error!("Drivetrain calibration failed, holding zero power: {}", e);
                RuntimeHealth::Faulted
            }
        };

        let Hardware {
            motors,
            encoders,
            operator,
            clock,
        } = hardware;
        let axes_received_at = clock.now();

        Self {
            drivetrain: Drivetrain::new(motors, DriveMixer::new(config.mirrored_side)),
            teleop: TeleopMixer::from_config(&config.teleop),
            config,
            encoders,
            operator,
            clock,
            odometer,
            auto: None,
            mode: Mode::Disabled,
            health,
            latest_axes: None,
            axes_received_at,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    pub fn is_faulted(&self) -> bool {
        self.odometer.is_err()
    }

    pub fn odometer(&self) -> Option<&Odometer> {
        self.odometer.as_ref().ok()
    }

    pub fn auto_state(&self) -> Option<RunState> {
        self.auto.as_ref().map(AutonomousController::state)
    }

    /// Mode entry hook. Autonomous entry zeroes the odometer and starts a
    /// new run from the configured strategy.
    pub fn enter(&mut self, mode: Mode) {
        info!("Entering {:?} mode", mode);
        self.mode = mode;
        self.auto = None;
        if !self.is_faulted() {
            self.health = RuntimeHealth::Ok;
        }

        match mode {
            Mode::Disabled => {}
            Mode::Autonomous => match &mut self.odometer {
                Ok(odom) => {
                    odom.reset();
                    self.auto = Some(AutonomousController::from_config(
                        &self.config.autonomous,
                        self.clock.now(),
                    ));
                }
                Err(e) => error!("Refusing autonomous run: {}", e),
            },
            Mode::Teleop => {
                // Give the operator a full timeout to produce a first reading
                self.latest_axes = None;
                self.axes_received_at = self.clock.now();
            }
        }
    }

    /// Periodic hook, called once per loop period
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();

        let sample = self.encoders.sample();
        if let Ok(odom) = &mut self.odometer {
            odom.apply(sample);
        }
        let snapshot = self.odometry();
        debug!(
            "Odometry: left={:.3} in, right={:.3} in, avg={:.3} in",
            snapshot.left_inch,
            snapshot.right_inch,
            snapshot.average_inch()
        );

        let command = self.compute_command(snapshot.average_inch(), now);
        let powers = self.apply(command);

        TickReport {
            mode: self.mode,
            command,
            powers,
            distance_inch: snapshot.average_inch(),
            run_state: self.auto_state(),
            health: self.health,
        }
    }

    fn odometry(&self) -> OdometrySnapshot {
        self.odometer
            .as_ref()
            .map(Odometer::snapshot)
            .unwrap_or_default()
    }

    fn compute_command(&mut self, distance_inch: f64, now: Duration) -> DriveCommand {
        if self.is_faulted() {
            return DriveCommand::stop();
        }

        match self.mode {
            Mode::Disabled => DriveCommand::stop(),
            Mode::Autonomous => match &mut self.auto {
                Some(auto) => auto.tick(distance_inch, now),
                None => DriveCommand::stop(),
            },
            Mode::Teleop => match self.watch_operator(now) {
                Some(axes) => self.teleop.compute(axes),
                None => DriveCommand::stop(),
            },
        }
    }

    /// Latest operator axes, or `None` once the input has gone stale
    fn watch_operator(&mut self, now: Duration) -> Option<AxisReading> {
        if let Some(axes) = self.operator.read_axes() {
            self.latest_axes = Some(axes);
            self.axes_received_at = now;
        }

        let age = now.saturating_sub(self.axes_received_at);
        if age > self.config.input_timeout() {
            // Watchdog triggered - stop the robot
            if self.health != RuntimeHealth::InputStale {
                warn!("Operator input stale ({:?} old), stopping robot", age);
            }
            self.health = RuntimeHealth::InputStale;
            None
        } else {
            if self.health == RuntimeHealth::InputStale {
                info!("Operator input restored");
            }
            self.health = RuntimeHealth::Ok;
            self.latest_axes
        }
    }

    fn apply(&mut self, command: DriveCommand) -> WheelPowers {
        let result = if self.is_faulted() {
            self.drivetrain.stop().map(|_| WheelPowers::zero())
        } else {
            self.drivetrain.drive(command)
        };

        match result {
            Ok(powers) => powers,
            Err(e) => {
                warn!("Motor output failed: {}", e);
                self.drivetrain.last_powers()
            }
        }
    }
}

/// Simulator run parameters
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: RobotConfig,
    pub mode: Mode,
    pub ticks: u64,
    /// Stick position held for the whole run (teleop)
    pub axes: Option<AxisReading>,
}

/// Final state of a simulator run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: Mode,
    pub ticks: u64,
    pub left_inch: f64,
    pub right_inch: f64,
    pub average_inch: f64,
    pub run_state: Option<RunState>,
    pub health: RuntimeHealth,
    pub pulses: (i64, i64),
}

/// Drive the runtime over simulated hardware at the configured loop rate
pub async fn run(options: RunOptions) -> Result<RunSummary, Box<dyn std::error::Error + Send + Sync>> {
    let RunOptions {
        config,
        mode,
        ticks,
        axes,
    } = options;
    config.validate()?;

    let period = config.loop_period();
    let plant = SimPlant::new(config.mirrored_side, DEFAULT_PULSES_PER_TICK);
    let hardware = Hardware {
        motors: Box::new(SimMotors(Arc::clone(&plant))),
        encoders: Box::new(SimEncoders(Arc::clone(&plant))),
        operator: Box::new(FixedAxes(axes)),
        clock: Box::new(MonotonicClock::new()),
    };

    let mut runtime = Runtime::new(config, hardware);
    let mut tick = interval(period);

    info!(
        "Runtime started: {}ms loop, {} ticks in {:?} mode",
        period.as_millis(),
        ticks,
        mode
    );

    runtime.enter(mode);
    let mut last = None;
    for _ in 0..ticks {
        tick.tick().await;
        last = Some(runtime.tick());
    }

    let run_state = runtime.auto_state();
    let health = runtime.health();
    runtime.enter(Mode::Disabled);
    runtime.tick();

    let snapshot = runtime.odometry();
    if let Some(report) = last {
        debug!("Last tick: {:?}", report);
    }

    Ok(RunSummary {
        mode,
        ticks,
        left_inch: snapshot.left_inch,
        right_inch: snapshot.right_inch,
        average_inch: snapshot.average_inch(),
        run_state,
        health,
        pulses: plant.counts(),
    })
}

/// Load a config file, or use the built-in defaults
pub fn load_config(path: Option<&std::path::Path>) -> Result<RobotConfig, ConfigError> {
    match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            RobotConfig::load(path)
        }
        None => Ok(RobotConfig::default()),
    }
}
