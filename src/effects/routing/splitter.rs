use crate::{
    AudioBuffer, Context, DspProcessor, GraphError, GraphNode, GraphResult, OwnedAudioBuffer,
    ProcessContext, SampleLocation,
};

/// Takes one channel of a multichannel input
///
/// Asking a splitter for anything other than a mono block is a wiring error.
pub struct Splitter {
    input: GraphNode,
    channel: usize,
    input_channels: usize,
    scratch: OwnedAudioBuffer,
}

impl Splitter {
    pub fn new(context: &Context, input: impl Into<GraphNode>, channel: usize) -> Self {
        let input = input.into();
        input.add_output();
        let input_channels = input.channel_count().max(1);

        Self {
            scratch: OwnedAudioBuffer::new(
                context.options().max_buffer_frames,
                input_channels,
                context.sample_rate(),
            ),
            input,
            channel,
            input_channels,
        }
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    pub fn set_channel(&mut self, channel: usize) {
        self.channel = channel;
    }
}

impl Drop for Splitter {
    fn drop(&mut self) {
        self.input.remove_output();
    }
}

impl DspProcessor for Splitter {
    fn is_active(&self) -> bool {
        self.input.is_active()
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        if context.channel_count() != 1 {
            return Err(GraphError::Logic(format!(
                "a splitter produces one channel, {} were requested",
                context.channel_count()
            )));
        }

        let input_channels = self.input_channels;
        if self.channel >= input_channels {
            return Err(GraphError::Logic(format!(
                "can't split channel {} of a {input_channels} channel input",
                self.channel
            )));
        }

        let frame_count = context.frame_count();
        self.scratch.reshape(input_channels, frame_count)?;
        self.input
            .next_buffer(&mut ProcessContext::new(&mut self.scratch, context.sequence))?;

        context.output_buffer.copy_from(
            &self.scratch,
            SampleLocation::channel(self.channel),
            SampleLocation::origin(),
            1,
            frame_count,
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_engine, Constant, EngineOptions, Joiner, Node};

    #[test]
    fn splits_one_channel() {
        let (context, _io) = create_engine(EngineOptions::default());
        let left = Node::new(&context, Constant::new(1.0));
        let right = Node::new(&context, Constant::new(2.0));
        let joiner = Node::new(&context, Joiner::new(&context, [&left, &right]));
        let splitter = Node::new(&context, Splitter::new(&context, &joiner, 1));

        let mut output = OwnedAudioBuffer::new(4, 1, 44_100);
        splitter
            .next_buffer(&mut ProcessContext::new(&mut output, 1))
            .unwrap();

        assert!(output
            .get_channel_data(SampleLocation::origin())
            .iter()
            .all(|sample| *sample == 2.0));
    }

    #[test]
    fn stereo_request_is_a_logic_error() {
        let (context, _io) = create_engine(EngineOptions::default());
        let source = Node::new(&context, Constant::new(1.0));
        let splitter = Node::new(&context, Splitter::new(&context, &source, 0));

        let mut output = OwnedAudioBuffer::new(4, 2, 44_100);
        let result = splitter.next_buffer(&mut ProcessContext::new(&mut output, 1));
        assert!(matches!(result, Err(GraphError::Logic(_))));
    }
}
