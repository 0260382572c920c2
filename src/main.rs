use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use xrp_drive_runtime::config::AutonomousStrategy;
use xrp_drive_runtime::drive::AxisReading;
use xrp_drive_runtime::messages::Mode;
use xrp_drive_runtime::runtime::{self, RunOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Disabled,
    Autonomous,
    Teleop,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Disabled => Mode::Disabled,
            ModeArg::Autonomous => Mode::Autonomous,
            ModeArg::Teleop => Mode::Teleop,
        }
    }
}

/// Run the drive controller against the simulated drivetrain
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON config file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "autonomous")]
    mode: ModeArg,

    /// Autonomous: drive this many inches
    #[arg(long, conflicts_with = "seconds")]
    distance: Option<f64>,

    /// Autonomous: drive for this many seconds
    #[arg(long)]
    seconds: Option<f64>,

    /// Number of loop periods to run
    #[arg(long, default_value_t = 250)]
    ticks: u64,

    /// Teleop: forward stick position (-1 is full forward)
    #[arg(long, allow_hyphen_values = true)]
    forward_axis: Option<f64>,

    /// Teleop: turn stick position
    #[arg(long, allow_hyphen_values = true)]
    turn_axis: Option<f64>,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = runtime::load_config(args.config.as_deref())?;
    if let Some(inches) = args.distance {
        config.autonomous.strategy = AutonomousStrategy::Distance { inches };
    }
    if let Some(seconds) = args.seconds {
        config.autonomous.strategy = AutonomousStrategy::Time { seconds };
    }

    let axes = match (args.forward_axis, args.turn_axis) {
        (None, None) => None,
        (forward, turn) => Some(AxisReading::new(
            forward.unwrap_or(0.0),
            turn.unwrap_or(0.0),
        )),
    };

    let summary = runtime::run(RunOptions {
        config,
        mode: args.mode.into(),
        ticks: args.ticks,
        axes,
    })
    .await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
