// Straight-line odometry from the left and right wheel encoders
//
// Distances are in inches and are relative to the last reset(). The average
// distance assumes straight travel: rotation in place moves the wheels in
// opposite directions and cancels out.

use std::sync::Arc;

use tracing::debug;

use super::encoder::EncoderChannel;

/// One reading from the encoder input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncoderSample {
    /// Pulses counted since the previous sample
    Delta { left: i64, right: i64 },
    /// Raw hardware counters. The first sample only sets the baseline.
    /// Counters that wrap at the i64 boundary still give the true delta.
    Cumulative { left: i64, right: i64 },
}

/// Distances taken from a single load of each channel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OdometrySnapshot {
    pub left_inch: f64,
    pub right_inch: f64,
}

impl OdometrySnapshot {
    pub fn average_inch(&self) -> f64 {
        (self.left_inch + self.right_inch) / 2.0
    }
}

#[derive(Debug)]
pub struct Odometer {
    left: Arc<EncoderChannel>,
    right: Arc<EncoderChannel>,
    distance_per_pulse: f64,

    /// Last raw counters seen from a cumulative source
    last_raw: Option<(i64, i64)>,
}

impl Odometer {
    /// `distance_per_pulse` comes from [`super::units::distance_per_pulse`]
    pub fn new(distance_per_pulse: f64) -> Self {
        Self::with_channels(
            Arc::new(EncoderChannel::new()),
            Arc::new(EncoderChannel::new()),
            distance_per_pulse,
        )
    }

    /// Build around channels that are also fed from elsewhere (e.g. an
    /// interrupt-driven pulse counter)
    pub fn with_channels(
        left: Arc<EncoderChannel>,
        right: Arc<EncoderChannel>,
        distance_per_pulse: f64,
    ) -> Self {
        Self {
            left,
            right,
            distance_per_pulse,
            last_raw: None,
        }
    }

    pub fn left_channel(&self) -> Arc<EncoderChannel> {
        Arc::clone(&self.left)
    }

    pub fn right_channel(&self) -> Arc<EncoderChannel> {
        Arc::clone(&self.right)
    }

    pub fn distance_per_pulse(&self) -> f64 {
        self.distance_per_pulse
    }

    /// Zero both channels. Later reads are relative to this instant.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        debug!("Odometer reset");
    }

    /// Feed one encoder sample
    pub fn apply(&mut self, sample: EncoderSample) {
        let (left, right) = match sample {
            EncoderSample::Delta { left, right } => (left, right),
            EncoderSample::Cumulative { left, right } => {
                let delta = match self.last_raw {
                    Some((prev_left, prev_right)) => {
                        (left.wrapping_sub(prev_left), right.wrapping_sub(prev_right))
                    }
                    None => (0, 0),
                };
                self.last_raw = Some((left, right));
                delta
            }
        };
        self.left.record(left);
        self.right.record(right);
    }

    pub fn left_distance(&self) -> f64 {
        self.left.count() as f64 * self.distance_per_pulse
    }

    pub fn right_distance(&self) -> f64 {
        self.right.count() as f64 * self.distance_per_pulse
    }

    pub fn average_distance(&self) -> f64 {
        self.snapshot().average_inch()
    }

    pub fn snapshot(&self) -> OdometrySnapshot {
        OdometrySnapshot {
            left_inch: self.left_distance(),
            right_inch: self.right_distance(),
        }
    }
}
