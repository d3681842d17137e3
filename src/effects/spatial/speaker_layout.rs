use std::f32::consts::{FRAC_1_SQRT_2, PI};

use crate::{GraphError, GraphResult};

/// Fixed 2-D loudspeaker positions, in channel order
///
/// Positive `y` is in front of the listener, positive `x` to their right.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerLayout {
    positions: Vec<(f32, f32)>,
}

impl SpeakerLayout {
    pub fn new(positions: Vec<(f32, f32)>) -> Self {
        Self { positions }
    }

    /// Two speakers at ±45° at `distance`
    pub fn stereo(distance: f32) -> Self {
        let c = FRAC_1_SQRT_2 * distance;
        Self::new(vec![(-c, c), (c, c)])
    }

    /// Front left, front right, rear right, rear left
    pub fn quad(distance: f32) -> Self {
        let c = FRAC_1_SQRT_2 * distance;
        Self::new(vec![(-c, c), (c, c), (c, -c), (-c, -c)])
    }

    /// Left, centre, right, right surround, left surround
    pub fn itu_5_1(distance: f32) -> Self {
        let angles = [
            2.0 / 3.0 * PI,
            0.5 * PI,
            PI / 3.0,
            17.0 / 9.0 * PI,
            10.0 / 9.0 * PI,
        ];

        Self::new(
            angles
                .iter()
                .map(|angle| (distance * angle.cos(), distance * angle.sin()))
                .collect(),
        )
    }

    /// Front pair, right side, rear pair, left side
    pub fn six(x: f32, y: f32) -> Self {
        Self::new(vec![(-x, y), (x, y), (x, 0.0), (x, -y), (-x, -y), (-x, 0.0)])
    }

    /// The preset for a channel count
    pub fn for_channel_count(channel_count: usize) -> GraphResult<Self> {
        match channel_count {
            2 => Ok(Self::stereo(10.0)),
            4 => Ok(Self::quad(10.0)),
            5 => Ok(Self::itu_5_1(10.0)),
            6 => Ok(Self::six(15.0, 20.0)),
            other => Err(GraphError::Value(format!(
                "no speaker layout for {other} channels"
            ))),
        }
    }

    pub fn speaker_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[(f32, f32)] {
        &self.positions
    }

    /// Inverse distance gains from a source at `position` to every speaker
    ///
    /// Distances below 1 are clamped so a source on top of a speaker gets unity gain.
    pub fn inverse_distance_gains(&self, position: (f32, f32), gains: &mut [f32]) {
        for (gain, (speaker_x, speaker_y)) in gains.iter_mut().zip(self.positions.iter()) {
            let distance = (position.0 - speaker_x).hypot(position.1 - speaker_y);
            *gain = 1.0 / distance.max(1.0);
        }
    }
}
