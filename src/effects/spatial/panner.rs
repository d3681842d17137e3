use crate::{
    AudioBuffer, Context, ControlInputs, ControlKey, Controllable, DspProcessor, Effect,
    GraphResult, PortInput, ProcessContext, SampleLocation, Scalable,
};

/// A stereo panner driven by a position in [-1, 1]
///
/// The input (its first channel, for wider inputs) is scaled, then split with gains
/// `0.5 - p` and `0.5 + p`, where `p` is half the position. Both the input and the
/// position are read per sample. The offset control is not applied.
pub struct Panner {
    controls: ControlInputs,
}

impl Panner {
    pub fn new(
        context: &Context,
        input: impl Into<PortInput>,
        position: impl Into<PortInput>,
    ) -> Self {
        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Input, input);
        controls.set(ControlKey::Position, position);
        controls.set(ControlKey::Scale, 1.0);
        controls.set(ControlKey::Offset, 0.0);

        Self { controls }
    }

    pub fn set_position(&mut self, position: impl Into<PortInput>) {
        self.controls.set(ControlKey::Position, position);
    }
}

impl Controllable for Panner {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Scalable for Panner {}

impl Effect for Panner {}

impl DspProcessor for Panner {
    fn channel_count(&self) -> usize {
        2
    }

    fn is_active(&self) -> bool {
        self.controls.input_is_active()
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        if context.channel_count() != 2 {
            log::error!(
                "Panner asked for {} channels, it only produces 2",
                context.channel_count()
            );
            context.output_buffer.clear();
            return Ok(());
        }

        let frame_count = context.frame_count();

        self.controls.check_input()?;
        self.controls.pull_all(frame_count, context.sequence)?;

        for frame in 0..frame_count {
            let position = self.controls.next_value(ControlKey::Position) * 0.5;
            let scale = self.controls.next_value(ControlKey::Scale);
            let input = self.controls.input_sample(0, frame) * scale;

            let l_location = SampleLocation::new(0, frame);
            let r_location = SampleLocation::new(1, frame);

            context
                .output_buffer
                .set_sample(l_location, input * (0.5 - position));
            context
                .output_buffer
                .set_sample(r_location, input * (position + 0.5));
        }

        Ok(())
    }
}
