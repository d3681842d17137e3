use crate::{
    AudioBuffer, Context, DspProcessor, GraphNode, GraphResult, OwnedAudioBuffer, ProcessContext,
    SampleLocation,
};

/// Sums any number of inputs
///
/// Inputs with the mixer's channel count are summed channel for channel. Mono inputs
/// are summed into every channel. Inputs with any other channel count are skipped
/// with a logged error, as are inputs that outgrow the scratch buffer after they were
/// added. Inputs can be added and removed between blocks.
pub struct Mixer {
    inputs: Vec<GraphNode>,
    scratch: OwnedAudioBuffer,
    channel_count: usize,
}

impl Mixer {
    pub fn new(context: &Context, channel_count: usize) -> Self {
        let scratch_channels = channel_count
            .max(context.options().output_channel_count)
            .max(1);

        Self {
            inputs: Vec::new(),
            scratch: OwnedAudioBuffer::new(
                context.options().max_buffer_frames,
                scratch_channels,
                context.sample_rate(),
            ),
            channel_count,
        }
    }

    /// Connect an input, widening the scratch buffer if the input needs more channels
    pub fn add_input(&mut self, input: impl Into<GraphNode>) {
        let input = input.into();
        let input_channels = input.channel_count();

        if input_channels > self.scratch.channel_capacity() {
            log::debug!("Widening mixer scratch to {input_channels} channels");
            self.scratch = OwnedAudioBuffer::new(
                self.scratch.capacity(),
                input_channels,
                self.scratch.sample_rate(),
            );
        }

        input.add_output();
        self.inputs.push(input);
    }

    fn scratch_fits(&self, channel_count: usize, frame_count: usize) -> bool {
        channel_count <= self.scratch.channel_capacity() && frame_count <= self.scratch.capacity()
    }

    /// Remove an input, returning whether it was connected
    pub fn remove_input(&mut self, input: impl Into<GraphNode>) -> bool {
        let input = input.into();

        match self.inputs.iter().position(|existing| *existing == input) {
            Some(index) => {
                self.inputs.remove(index).remove_output();
                true
            }
            None => false,
        }
    }

    /// Disconnect every input
    pub fn delete_inputs(&mut self) {
        for input in self.inputs.drain(..) {
            input.remove_output();
        }
    }

    pub fn inputs(&self) -> &[GraphNode] {
        &self.inputs
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// How many inputs still have signal
    pub fn active_sources(&self) -> usize {
        self.inputs.iter().filter(|input| input.is_active()).count()
    }
}

impl Drop for Mixer {
    fn drop(&mut self) {
        self.delete_inputs();
    }
}

impl DspProcessor for Mixer {
    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn is_active(&self) -> bool {
        self.inputs.iter().any(|input| input.is_active())
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let frame_count = context.frame_count();
        let output_channels = context.channel_count();

        context.output_buffer.clear();

        for input in self.inputs.iter() {
            if !input.is_active() {
                continue;
            }

            let input_channels = input.channel_count().max(1);

            if input_channels != output_channels && input_channels != 1 {
                log::error!(
                    "Mixer can't sum a {input_channels} channel input into {output_channels} channels"
                );
                continue;
            }

            if !self.scratch_fits(input_channels, frame_count) {
                log::error!(
                    "Mixer skipped a {input_channels} x {frame_count} input wider than its scratch buffer"
                );
                continue;
            }

            self.scratch.reshape(input_channels, frame_count)?;
            input.next_buffer(&mut ProcessContext::new(&mut self.scratch, context.sequence))?;

            if input_channels == output_channels {
                context.output_buffer.add_from(
                    &self.scratch,
                    SampleLocation::origin(),
                    SampleLocation::origin(),
                    output_channels,
                    frame_count,
                );
            } else {
                for channel in 0..output_channels {
                    context.output_buffer.add_from(
                        &self.scratch,
                        SampleLocation::origin(),
                        SampleLocation::channel(channel),
                        1,
                        frame_count,
                    );
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_engine, Constant, EngineOptions, Node};

    #[test]
    fn remove_input_disconnects() {
        let (context, _io) = create_engine(EngineOptions::default());
        let source = Node::new(&context, Constant::new(1.0));
        let mut mixer = Mixer::new(&context, 1);

        mixer.add_input(&source);
        assert_eq!(source.generator().output_count(), 1);

        assert!(mixer.remove_input(&source));
        assert!(!mixer.remove_input(&source));
        assert_eq!(source.generator().output_count(), 0);
    }

    #[test]
    fn mismatched_inputs_are_skipped() {
        let (context, _io) = create_engine(EngineOptions::default());
        let mut stereo = Mixer::new(&context, 2);
        stereo.add_input(&Node::new(&context, Constant::new(1.0)));
        let stereo = Node::new(&context, stereo);
        let mono = Node::new(&context, Constant::new(0.25));

        let mut mixer = Mixer::new(&context, 4);
        mixer.add_input(&mono);
        mixer.add_input(&stereo);
        let mixer = Node::new(&context, mixer);

        let mut output = OwnedAudioBuffer::new(8, 4, 44_100);
        mixer
            .next_buffer(&mut ProcessContext::new(&mut output, 1))
            .unwrap();

        for channel in 0..4 {
            assert!(output
                .get_channel_data(SampleLocation::channel(channel))
                .iter()
                .all(|sample| *sample == 0.25));
        }
    }

    #[test]
    fn counts_active_sources() {
        let (context, _io) = create_engine(EngineOptions::default());
        let mut mixer = Mixer::new(&context, 2);
        mixer.add_input(&Node::new(&context, Constant::new(1.0)));
        mixer.add_input(&Node::new(&context, Constant::new(1.0)));

        assert_eq!(mixer.active_sources(), 2);

        mixer.delete_inputs();
        assert_eq!(mixer.input_count(), 0);
        assert_eq!(mixer.active_sources(), 0);
    }
}
