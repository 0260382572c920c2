// End-to-end mode lifecycle against the simulated drivetrain

use std::sync::Arc;
use std::time::Duration;

use xrp_drive_runtime::auto::RunState;
use xrp_drive_runtime::config::{AutonomousStrategy, RobotConfig};
use xrp_drive_runtime::drive::AxisReading;
use xrp_drive_runtime::hal::ManualClock;
use xrp_drive_runtime::messages::{Mode, RuntimeHealth};
use xrp_drive_runtime::runtime::{run, Hardware, RunOptions, Runtime};
use xrp_drive_runtime::sim::{FixedAxes, SimCumulativeEncoders, SimMotors, SimPlant};

const TICK: Duration = Duration::from_millis(20);

#[tokio::test]
async fn test_run_autonomous_distance() {
    let mut config = RobotConfig::default();
    config.autonomous.strategy = AutonomousStrategy::Distance { inches: 1.0 };

    let summary = run(RunOptions {
        config,
        mode: Mode::Autonomous,
        ticks: 20,
        axes: None,
    })
    .await
    .unwrap();

    assert_eq!(summary.run_state, Some(RunState::Stopped));
    assert!(summary.average_inch >= 1.0, "stopped short at {}", summary.average_inch);
    // 0.127 in per tick at half power: no more than one tick of overshoot
    assert!(summary.average_inch < 1.2, "overshot to {}", summary.average_inch);
    assert_eq!(summary.health, RuntimeHealth::Ok);
}

#[tokio::test]
async fn test_run_rejects_invalid_tunables() {
    let mut config = RobotConfig::default();
    config.autonomous.forward_speed = 2.0;

    let result = run(RunOptions {
        config,
        mode: Mode::Autonomous,
        ticks: 1,
        axes: None,
    })
    .await;
    assert!(result.is_err());
}

#[test]
fn test_teleop_then_autonomous_with_cumulative_encoders() {
    let config = RobotConfig::default();
    let plant = SimPlant::new(config.mirrored_side, 20.0);
    let clock = ManualClock::new();
    let mut runtime = Runtime::new(
        config,
        Hardware {
            motors: Box::new(SimMotors(Arc::clone(&plant))),
            encoders: Box::new(SimCumulativeEncoders(Arc::clone(&plant))),
            operator: Box::new(FixedAxes(Some(AxisReading::new(-1.0, 0.0)))),
            clock: Box::new(clock.clone()),
        },
    );

    runtime.enter(Mode::Teleop);
    for _ in 0..25 {
        clock.advance(TICK);
        runtime.tick();
    }
    let (left, right) = plant.counts();
    assert!(left > 0 && right > 0, "robot did not move in teleop");

    runtime.enter(Mode::Autonomous);
    let mut reports = Vec::new();
    for _ in 0..100 {
        clock.advance(TICK);
        reports.push(runtime.tick());
    }

    // The teleop travel does not count toward the 5 inch target
    let first_stop = reports
        .iter()
        .position(|r| r.run_state == Some(RunState::Stopped))
        .expect("autonomous run never stopped");
    assert!(first_stop > 30, "stopped after only {} ticks", first_stop);
    assert!(reports[first_stop..].iter().all(|r| r.powers.is_zero()));
    assert!(reports[first_stop].distance_inch >= 5.0);
}
