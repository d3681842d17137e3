use crate::{
    AudioBuffer, Context, ControlInputs, ControlKey, Controllable, DspProcessor, Effect,
    GraphResult, PortInput, ProcessContext, SampleLocation, Scalable,
};

const DEFAULT_CUTOFF: f32 = 500.0;
const DEFAULT_RESONANCE: f32 = 0.99;

#[derive(Clone, Copy, Default)]
struct LadderState {
    x: f32,
    y1: f32,
    y2: f32,
    y3: f32,
    y4: f32,
    old_x: f32,
    old_y1: f32,
    old_y2: f32,
    old_y3: f32,
}

impl LadderState {
    fn process(&mut self, input: f32, tuning: &LadderTuning) -> f32 {
        let LadderTuning { k, p, r } = *tuning;

        self.x = input - r * self.y4;

        self.y1 = self.x * p + self.old_x * p - k * self.y1;
        self.y2 = self.y1 * p + self.old_y1 * p - k * self.y2;
        self.y3 = self.y2 * p + self.old_y2 * p - k * self.y3;
        self.y4 = self.y3 * p + self.old_y3 * p - k * self.y4;

        self.y4 -= self.y4 * self.y4 * self.y4 / 6.0;

        self.old_x = self.x;
        self.old_y1 = self.y1;
        self.old_y2 = self.y2;
        self.old_y3 = self.y3;

        self.y4
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct LadderTuning {
    k: f32,
    p: f32,
    r: f32,
}

impl LadderTuning {
    fn new(cutoff: f32, resonance: f32, sample_rate: f32) -> Self {
        let f = 2.0 * cutoff / sample_rate;
        let k = 3.6 * f - 1.6 * f * f - 1.0;
        let p = (k + 1.0) * 0.5;
        let scale = ((1.0 - p) * 1.386_249).exp();

        Self {
            k,
            p,
            r: resonance * scale,
        }
    }
}

/// A four-stage ladder low pass with resonance and a cubic soft clip
///
/// Cutoff and resonance are read once per block. High resonance can self-oscillate.
pub struct Moog {
    controls: ControlInputs,
    states: Vec<LadderState>,
    sample_rate: f32,
}

impl Moog {
    pub fn new(context: &Context) -> Self {
        Self::with_cutoff(context, DEFAULT_CUTOFF, DEFAULT_RESONANCE)
    }

    pub fn with_cutoff(
        context: &Context,
        cutoff: impl Into<PortInput>,
        resonance: impl Into<PortInput>,
    ) -> Self {
        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Frequency, cutoff);
        controls.set(ControlKey::Amount, resonance);
        controls.set(ControlKey::Scale, 1.0);
        controls.set(ControlKey::Offset, 0.0);

        Self {
            controls,
            states: vec![LadderState::default(); context.options().output_channel_count.max(1)],
            sample_rate: context.sample_rate() as f32,
        }
    }

    pub fn set_cutoff(&mut self, cutoff: impl Into<PortInput>) {
        self.controls.set(ControlKey::Frequency, cutoff);
    }

    pub fn set_resonance(&mut self, resonance: impl Into<PortInput>) {
        self.controls.set(ControlKey::Amount, resonance);
    }

    /// Zero the ladder state
    pub fn clear(&mut self) {
        self.states.fill(LadderState::default());
    }

    fn reserve_states(&mut self) {
        let channel_count = self.controls.input_channel_count();
        if self.states.len() < channel_count {
            self.states.resize(channel_count, LadderState::default());
        }
    }
}

impl Controllable for Moog {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Scalable for Moog {}

impl Effect for Moog {
    fn set_input(&mut self, input: impl Into<PortInput>) {
        self.controls.set(ControlKey::Input, input);
        self.reserve_states();
    }
}

impl DspProcessor for Moog {
    fn channel_count(&self) -> usize {
        self.controls.input_channel_count().max(1)
    }

    fn is_active(&self) -> bool {
        self.controls.input_is_active()
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let frame_count = context.frame_count();
        let channel_count = context.channel_count();

        self.controls.check_input()?;
        self.controls.pull_all(frame_count, context.sequence)?;

        let filtered_channels = channel_count.min(self.states.len());

        let tuning = LadderTuning::new(
            self.controls.value(ControlKey::Frequency),
            self.controls.value(ControlKey::Amount),
            self.sample_rate,
        );

        for frame in 0..frame_count {
            let scale = self.controls.next_value(ControlKey::Scale);
            let offset = self.controls.next_value(ControlKey::Offset);

            for channel in 0..filtered_channels {
                let input = self.controls.input_sample(channel, frame);
                let output = self.states[channel].process(input, &tuning);

                context
                    .output_buffer
                    .set_sample(SampleLocation::new(channel, frame), output * scale + offset);
            }
        }

        for channel in filtered_channels..channel_count {
            context.output_buffer.duplicate_channel(
                SampleLocation::channel(filtered_channels - 1),
                channel,
                frame_count,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_engine, Constant, EngineOptions, Joiner, Node, OwnedAudioBuffer};
    use approx::assert_relative_eq;

    #[test]
    fn tuning_follows_the_cutoff() {
        let tuning = LadderTuning::new(11_025.0, 0.0, 44_100.0);
        assert_relative_eq!(tuning.k, 0.4, epsilon = 1e-6);
        assert_relative_eq!(tuning.p, 0.7, epsilon = 1e-6);
        assert_relative_eq!(tuning.r, 0.0);
    }

    #[test]
    fn settles_on_a_constant_input() {
        let (context, _io) = create_engine(EngineOptions::default());
        let source = Node::new(&context, Constant::new(0.5));
        let mut moog = Moog::with_cutoff(&context, 2_000.0, 0.0);
        moog.set_input(&source);
        let moog = Node::new(&context, moog);

        let mut output = OwnedAudioBuffer::new(4_096, 1, 44_100);
        moog.next_buffer(&mut ProcessContext::new(&mut output, 1))
            .unwrap();

        let settled = output.get_sample(SampleLocation::frame(4_095));
        let previous = output.get_sample(SampleLocation::frame(4_094));
        assert_relative_eq!(settled, previous, epsilon = 1e-5);
        assert_relative_eq!(settled, 0.447, epsilon = 1e-3);
    }

    #[test]
    fn first_sample_is_attenuated() {
        let (context, _io) = create_engine(EngineOptions::default());
        let source = Node::new(&context, Constant::new(1.0));
        let mut moog = Moog::new(&context);
        moog.set_input(&source);
        let moog = Node::new(&context, moog);

        let mut output = OwnedAudioBuffer::new(1, 1, 44_100);
        moog.next_buffer(&mut ProcessContext::new(&mut output, 1))
            .unwrap();

        assert!(output.get_sample(SampleLocation::origin()).abs() < 0.01);
    }

    #[test]
    fn ladder_states_are_sized_when_the_input_is_set() {
        let (context, _io) = create_engine(EngineOptions::default().with_output_channel_count(1));
        let constants = [0.5, 0.5].map(|value| Node::new(&context, Constant::new(value)));
        let joiner = Node::new(&context, Joiner::new(&context, &constants));

        let mut moog = Moog::with_cutoff(&context, 2_000.0, 0.0);
        assert_eq!(moog.states.len(), 1);
        moog.set_input(&joiner);
        assert_eq!(moog.states.len(), 2);
        let moog = Node::new(&context, moog);

        let mut output = OwnedAudioBuffer::new(64, 3, 44_100);
        moog.next_buffer(&mut ProcessContext::new(&mut output, 1))
            .unwrap();

        assert_eq!(moog.lock().states.len(), 2);
        assert_eq!(
            output.get_channel_data(SampleLocation::channel(1)),
            output.get_channel_data(SampleLocation::channel(2))
        );
    }
}
