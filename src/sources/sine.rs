use std::f32::consts::TAU;

use crate::{
    Context, ControlInputs, ControlKey, Controllable, DspProcessor, GraphResult, Phase, Phased,
    Scalable,
};

/// A sine oscillator computed directly, with frequency, scale and offset inputs
pub struct Sine {
    controls: ControlInputs,
    phase: Phase,
    sample_rate: f32,
}

impl Sine {
    pub fn new(context: &Context, frequency: f32) -> Self {
        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Frequency, frequency);
        controls.set(ControlKey::Scale, 1.0);
        controls.set(ControlKey::Offset, 0.0);

        Self {
            controls,
            phase: Phase::default(),
            sample_rate: context.sample_rate() as f32,
        }
    }
}

impl Controllable for Sine {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Scalable for Sine {}

impl Phased for Sine {
    fn phase(&self) -> f32 {
        self.phase.value()
    }

    fn set_phase(&mut self, phase: f32) {
        self.phase.set(phase);
    }
}

impl DspProcessor for Sine {
    fn prepare_block(&mut self, frame_count: usize, sequence: u64) -> GraphResult<()> {
        self.controls.pull_all(frame_count, sequence)
    }

    fn process_channel(&mut self, output: &mut [f32], _channel: usize) -> GraphResult<()> {
        for sample in output.iter_mut() {
            let frequency = self.controls.next_value(ControlKey::Frequency);
            let scale = self.controls.next_value(ControlKey::Scale);
            let offset = self.controls.next_value(ControlKey::Offset);

            let phase = self.phase.advance(frequency, self.sample_rate);
            *sample = (TAU * phase).sin() * scale + offset;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_engine, EngineOptions};
    use approx::assert_abs_diff_eq;

    #[test]
    fn quarter_rate_sine_hits_the_peaks() {
        let (context, _io) = create_engine(EngineOptions::default().with_sample_rate(4));
        let mut sine = Sine::new(&context, 1.0);
        sine.prepare_block(4, 1).unwrap();

        let mut output = [0.0; 4];
        sine.process_channel(&mut output, 0).unwrap();

        assert_abs_diff_eq!(output[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(output[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(output[2], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(output[3], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn scale_and_offset_shape_the_output() {
        let (context, _io) = create_engine(EngineOptions::default().with_sample_rate(4));
        let mut sine = Sine::new(&context, 1.0);
        sine.set_scale(0.5);
        sine.set_offset(1.0);
        sine.set_phase(0.25);
        sine.prepare_block(1, 1).unwrap();

        let mut output = [0.0; 1];
        sine.process_channel(&mut output, 0).unwrap();

        assert_abs_diff_eq!(output[0], 1.5, epsilon = 1e-6);
    }
}
