use std::f32::consts::TAU;

use crate::{
    Context, ControlInputs, ControlKey, Controllable, DspProcessor, GraphError, GraphResult,
    Phase, Phased, Scalable,
};

const DEFAULT_TABLE_SIZE: usize = 8_192;

/// An oscillator reading a single cycle from a table with linear interpolation
pub struct WavetableOscillator {
    controls: ControlInputs,
    phase: Phase,
    wavetable: Vec<f32>,
    sample_rate: f32,
}

impl WavetableOscillator {
    /// Play `wavetable` as one cycle of the waveform
    pub fn new(context: &Context, wavetable: Vec<f32>, frequency: f32) -> GraphResult<Self> {
        if wavetable.is_empty() {
            return Err(GraphError::Value(
                "a wavetable needs at least one sample".to_string(),
            ));
        }

        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Frequency, frequency);
        controls.set(ControlKey::Scale, 1.0);
        controls.set(ControlKey::Offset, 0.0);

        Ok(Self {
            controls,
            phase: Phase::default(),
            wavetable,
            sample_rate: context.sample_rate() as f32,
        })
    }

    pub fn sine(context: &Context, frequency: f32) -> GraphResult<Self> {
        Self::new(context, table(|phase| (TAU * phase).sin()), frequency)
    }

    pub fn sawtooth(context: &Context, frequency: f32) -> GraphResult<Self> {
        Self::new(context, table(|phase| 2.0 * phase - 1.0), frequency)
    }

    pub fn square(context: &Context, frequency: f32) -> GraphResult<Self> {
        Self::new(
            context,
            table(|phase| if phase < 0.5 { 1.0 } else { -1.0 }),
            frequency,
        )
    }

    pub fn triangle(context: &Context, frequency: f32) -> GraphResult<Self> {
        Self::new(
            context,
            table(|phase| 1.0 - 4.0 * (phase - 0.5).abs()),
            frequency,
        )
    }

    fn get_value(&self, phase: f32) -> f32 {
        let length = self.wavetable.len();
        let offset = phase * length as f32;

        let offset_before = (offset.floor() as usize) % length;
        let offset_after = (offset_before + 1) % length;

        let weighting = offset - offset.floor();
        interpolate(
            self.wavetable[offset_before],
            self.wavetable[offset_after],
            weighting,
        )
    }
}

fn table(shape: impl Fn(f32) -> f32) -> Vec<f32> {
    (0..DEFAULT_TABLE_SIZE)
        .map(|index| shape(index as f32 / DEFAULT_TABLE_SIZE as f32))
        .collect()
}

fn interpolate(a: f32, b: f32, amount_of_b: f32) -> f32 {
    (1.0 - amount_of_b) * a + amount_of_b * b
}

impl Controllable for WavetableOscillator {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Scalable for WavetableOscillator {}

impl Phased for WavetableOscillator {
    fn phase(&self) -> f32 {
        self.phase.value()
    }

    fn set_phase(&mut self, phase: f32) {
        self.phase.set(phase);
    }
}

impl DspProcessor for WavetableOscillator {
    fn prepare_block(&mut self, frame_count: usize, sequence: u64) -> GraphResult<()> {
        self.controls.pull_all(frame_count, sequence)
    }

    fn process_channel(&mut self, output: &mut [f32], _channel: usize) -> GraphResult<()> {
        for sample in output.iter_mut() {
            let frequency = self.controls.next_value(ControlKey::Frequency);
            let scale = self.controls.next_value(ControlKey::Scale);
            let offset = self.controls.next_value(ControlKey::Offset);

            let phase = self.phase.advance(frequency, self.sample_rate);
            *sample = self.get_value(phase) * scale + offset;
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
    fn interpolates_between_table_entries() {
        let (context, _io) = create_engine(EngineOptions::default().with_sample_rate(4));
        let mut oscillator = WavetableOscillator::new(&context, vec![0.0, 1.0], 1.0).unwrap();
        oscillator.prepare_block(4, 1).unwrap();

        let mut output = [0.0; 4];
        oscillator.process_channel(&mut output, 0).unwrap();

        for (sample, expected) in output.iter().zip([0.0, 0.5, 1.0, 0.5]) {
            assert_abs_diff_eq!(*sample, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn empty_tables_are_rejected() {
        let (context, _io) = create_engine(EngineOptions::default());
        assert!(matches!(
            WavetableOscillator::new(&context, Vec::new(), 440.0),
            Err(GraphError::Value(_))
        ));
    }

    #[test]
    fn table_sine_matches_the_direct_sine() {
        let (context, _io) = create_engine(EngineOptions::default());
        let mut oscillator = WavetableOscillator::sine(&context, 441.0).unwrap();
        oscillator.prepare_block(100, 1).unwrap();

        let mut output = [0.0; 100];
        oscillator.process_channel(&mut output, 0).unwrap();

        for (index, sample) in output.iter().enumerate() {
            let expected = (TAU * 441.0 * index as f32 / 44_100.0).sin();
            assert_abs_diff_eq!(*sample, expected, epsilon = 1e-3);
        }
    }
}
