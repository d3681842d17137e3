use std::{
    ops::{Add, Sub},
    time::Duration,
};

type FixedPoint = fixed::types::I32F32;

/// A fixed-point position in time, used to convert between seconds and frames
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: FixedPoint,
}

impl Sub for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_sub(rhs.seconds),
        }
    }
}

impl Add for Timestamp {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_add(rhs.seconds),
        }
    }
}

impl Timestamp {
    /// Zero seconds
    pub fn zero() -> Self {
        Self {
            seconds: FixedPoint::ZERO,
        }
    }

    /// Create a timestamp from a number of seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds: FixedPoint::saturating_from_num(seconds),
        }
    }

    /// Create a timestamp from a number of frames at a sample rate
    pub fn from_samples(samples: f64, sample_rate: usize) -> Self {
        Self::from_seconds(samples / sample_rate as f64)
    }

    /// Create a timestamp from a duration
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_seconds(duration.as_secs_f64())
    }

    /// Get the number of seconds
    pub fn as_seconds(&self) -> f64 {
        self.seconds.to_num()
    }

    /// Get the number of frames at a sample rate
    pub fn as_samples(&self, sample_rate: usize) -> f64 {
        self.seconds.to_num::<f64>() * sample_rate as f64
    }

    /// Get the number of whole frames at a sample rate, rounded to the nearest frame
    pub fn as_frames(&self, sample_rate: usize) -> usize {
        self.as_samples(sample_rate).round().max(0.0) as usize
    }

    /// Increment by a number of frames
    pub fn incremented_by_samples(&self, sample_count: usize, sample_rate: usize) -> Self {
        *self + Self::from_samples(sample_count as f64, sample_rate)
    }
}
