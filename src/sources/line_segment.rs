use crate::{Context, DspProcessor, GraphResult, Timestamp};

/// A linear ramp from `start` to `end` over a number of frames, then holding `end`
pub struct LineSegment {
    start: f32,
    end: f32,
    duration: usize,
    position: usize,
    sample_rate: usize,
}

impl LineSegment {
    pub fn new(context: &Context, start: f32, end: f32, duration_in_frames: usize) -> Self {
        Self {
            start,
            end,
            duration: duration_in_frames,
            position: 0,
            sample_rate: context.sample_rate(),
        }
    }

    pub fn with_duration(context: &Context, start: f32, end: f32, duration: Timestamp) -> Self {
        Self::new(context, start, end, duration.as_frames(context.sample_rate()))
    }

    /// Restart the ramp from `start`
    pub fn trigger(&mut self) {
        self.position = 0;
    }

    /// Move the ramp to new end points and restart it
    pub fn set_values(&mut self, start: f32, end: f32) {
        self.start = start;
        self.end = end;
        self.trigger();
    }

    pub fn duration(&self) -> Timestamp {
        Timestamp::from_samples(self.duration as f64, self.sample_rate)
    }

    /// Whether the ramp has reached `end`
    pub fn is_finished(&self) -> bool {
        self.position >= self.duration
    }

    fn value_at(&self, position: usize) -> f32 {
        if position >= self.duration {
            return self.end;
        }

        let ratio = position as f32 / self.duration as f32;
        self.start + (self.end - self.start) * ratio
    }
}

impl DspProcessor for LineSegment {
    fn process_channel(&mut self, output: &mut [f32], _channel: usize) -> GraphResult<()> {
        for sample in output.iter_mut() {
            *sample = self.value_at(self.position);
            self.position = self.position.saturating_add(1);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_engine, EngineOptions};

    #[test]
    fn ramps_then_holds_the_end_value() {
        let (context, _io) = create_engine(EngineOptions::default());
        let mut line = LineSegment::new(&context, 1.0, 0.0, 4);

        let mut output = [0.0; 6];
        line.process_channel(&mut output, 0).unwrap();

        assert_eq!(output, [1.0, 0.75, 0.5, 0.25, 0.0, 0.0]);
        assert!(line.is_finished());
    }

    #[test]
    fn trigger_restarts_the_ramp() {
        let (context, _io) = create_engine(EngineOptions::default());
        let mut line = LineSegment::new(&context, 0.0, 1.0, 2);

        let mut output = [0.0; 4];
        line.process_channel(&mut output, 0).unwrap();
        line.trigger();
        line.process_channel(&mut output, 0).unwrap();

        assert_eq!(output, [0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn zero_length_ramp_jumps_to_the_end() {
        let (context, _io) = create_engine(EngineOptions::default());
        let mut line = LineSegment::new(&context, 0.0, 3.0, 0);

        let mut output = [0.0; 2];
        line.process_channel(&mut output, 0).unwrap();

        assert_eq!(output, [3.0, 3.0]);
    }
}
