use crate::{AudioBuffer, SampleLocation};

/// One short windowed snippet of sample playback
///
/// `position`, `duration` and `time` are in frames. `envelope` places the peak of the
/// triangular window as a fraction of the duration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Grain {
    pub position: f32,
    pub rate: f32,
    pub duration: f32,
    pub time: f32,
    pub pan: f32,
    pub amplitude: f32,
    pub envelope: f32,
    pub delay: usize,
}

impl Grain {
    pub fn is_finished(&self) -> bool {
        self.time >= self.duration
    }

    /// The gain of the triangular window at the current time
    pub fn envelope_gain(&self) -> f32 {
        let peak = self.duration * self.envelope;

        if self.time < peak {
            self.time / peak
        } else if self.duration > peak {
            (self.duration - self.time) / (self.duration - peak)
        } else {
            0.0
        }
    }

    /// Add the grain into the first two channels of `output`
    pub(crate) fn render(
        &mut self,
        table: &[f32],
        output: &mut dyn AudioBuffer,
        frame_count: usize,
    ) {
        let length = table.len() as i64;
        if length == 0 {
            return;
        }

        for frame in 0..frame_count {
            if self.is_finished() {
                break;
            }

            if self.delay > 0 {
                self.delay -= 1;
                continue;
            }

            let index = (self.position.floor() as i64).rem_euclid(length) as usize;
            let sample = table[index] * self.amplitude * self.envelope_gain();

            output.add_sample(SampleLocation::new(0, frame), sample * (1.0 - self.pan));
            output.add_sample(SampleLocation::new(1, frame), sample * self.pan);

            self.position += self.rate;
            self.time += 1.0;
        }
    }
}
