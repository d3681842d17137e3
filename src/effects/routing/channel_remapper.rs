use crate::{
    AudioBuffer, ChannelMappedBuffer, Context, DspProcessor, GraphError, GraphNode, GraphResult,
    OwnedAudioBuffer, ProcessContext, SampleLocation,
};

/// How a remapper fills its output channels from its input
#[derive(Debug, Clone, PartialEq)]
pub enum RemapMode {
    /// Copy input channels in order, silencing any extra output channels
    PassThrough,
    /// Average of the first two input channels on every output channel
    StereoToMono,
    /// The first input channel on every output channel
    LeftToMono,
    /// The second input channel on every output channel
    RightToMono,
    /// Output channel `i` takes input channel `map[i]`
    Map(Vec<usize>),
}

/// Reshapes the channels of its input, with a gain per output channel
pub struct ChannelRemapper {
    input: GraphNode,
    mode: RemapMode,
    gains: Vec<f32>,
    input_channels: usize,
    output_channels: usize,
    scratch: OwnedAudioBuffer,
}

impl ChannelRemapper {
    pub fn new(
        context: &Context,
        input: impl Into<GraphNode>,
        mode: RemapMode,
        output_channels: usize,
    ) -> GraphResult<Self> {
        let input = input.into();
        let input_channels = input.channel_count().max(1);

        if let RemapMode::Map(map) = &mode {
            if map.len() != output_channels {
                return Err(GraphError::Value(format!(
                    "a channel map of {} entries can't fill {output_channels} channels",
                    map.len()
                )));
            }
        }

        if matches!(mode, RemapMode::StereoToMono | RemapMode::RightToMono) && input_channels < 2 {
            return Err(GraphError::Value(format!(
                "{mode:?} needs a stereo input, this one has {input_channels} channels"
            )));
        }

        input.add_output();

        Ok(Self {
            scratch: OwnedAudioBuffer::new(
                context.options().max_buffer_frames,
                input_channels,
                context.sample_rate(),
            ),
            input,
            mode,
            gains: vec![1.0; output_channels],
            input_channels,
            output_channels,
        })
    }

    pub fn set_gain(&mut self, channel: usize, gain: f32) -> GraphResult<()> {
        let slot = self.gains.get_mut(channel).ok_or_else(|| {
            GraphError::OutOfRange(format!("no output channel {channel} to set a gain on"))
        })?;
        *slot = gain;
        Ok(())
    }

    pub fn mode(&self) -> &RemapMode {
        &self.mode
    }

    fn fill(&mut self, output: &mut dyn AudioBuffer, frame_count: usize) -> GraphResult<()> {
        let output_channels = output.channel_count();

        match &self.mode {
            RemapMode::PassThrough => {
                let copied = output_channels.min(self.input_channels);
                output.copy_from(
                    &self.scratch,
                    SampleLocation::origin(),
                    SampleLocation::origin(),
                    copied,
                    frame_count,
                );
                for channel in copied..output_channels {
                    output.fill_channel_with_value(channel, 0.0);
                }
            }
            RemapMode::StereoToMono => {
                let left = self.scratch.get_channel_data(SampleLocation::channel(0));
                let right = self.scratch.get_channel_data(SampleLocation::channel(1));

                let mono = output.get_channel_data_mut(SampleLocation::channel(0));
                for (sample, (left, right)) in mono.iter_mut().zip(left.iter().zip(right.iter())) {
                    *sample = 0.5 * (left + right);
                }

                for channel in 1..output_channels {
                    output.duplicate_channel(SampleLocation::channel(0), channel, frame_count);
                }
            }
            RemapMode::LeftToMono | RemapMode::RightToMono => {
                let source = if self.mode == RemapMode::LeftToMono { 0 } else { 1 };
                for channel in 0..output_channels {
                    output.copy_from(
                        &self.scratch,
                        SampleLocation::channel(source),
                        SampleLocation::channel(channel),
                        1,
                        frame_count,
                    );
                }
            }
            RemapMode::Map(map) => {
                let mapped = ChannelMappedBuffer::new(&mut self.scratch, map).ok_or_else(|| {
                    GraphError::Logic(format!(
                        "channel map {map:?} refers past a {} channel input",
                        self.input_channels
                    ))
                })?;

                output.copy_from(
                    &mapped,
                    SampleLocation::origin(),
                    SampleLocation::origin(),
                    output_channels.min(map.len()),
                    frame_count,
                );
            }
        }

        Ok(())
    }
}

impl Drop for ChannelRemapper {
    fn drop(&mut self) {
        self.input.remove_output();
    }
}

impl DspProcessor for ChannelRemapper {
    fn channel_count(&self) -> usize {
        self.output_channels
    }

    fn is_active(&self) -> bool {
        self.input.is_active()
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let frame_count = context.frame_count();

        self.scratch.reshape(self.input_channels, frame_count)?;
        self.input
            .next_buffer(&mut ProcessContext::new(&mut self.scratch, context.sequence))?;

        self.fill(context.output_buffer, frame_count)?;

        for (channel, gain) in self.gains.iter().enumerate() {
            if channel >= context.channel_count() {
                break;
            }

            if *gain != 1.0 {
                context
                    .output_buffer
                    .get_channel_data_mut(SampleLocation::channel(channel))
                    .iter_mut()
                    .for_each(|sample| *sample *= gain);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_engine, Constant, EngineOptions, Joiner, Node};

    fn remap(mode: RemapMode, output_channels: usize) -> OwnedAudioBuffer {
        let (context, _io) = create_engine(EngineOptions::default());
        let left = Node::new(&context, Constant::new(1.0));
        let right = Node::new(&context, Constant::new(3.0));
        let joiner = Node::new(&context, Joiner::new(&context, [&left, &right]));
        let remapper = ChannelRemapper::new(&context, &joiner, mode, output_channels).unwrap();
        let remapper = Node::new(&context, remapper);

        let mut output = OwnedAudioBuffer::new(4, output_channels, 44_100);
        remapper
            .next_buffer(&mut ProcessContext::new(&mut output, 1))
            .unwrap();
        output
    }

    fn last_frame(buffer: &OwnedAudioBuffer) -> Vec<f32> {
        (0..buffer.channel_count())
            .map(|channel| buffer.get_sample(SampleLocation::new(channel, 3)))
            .collect()
    }

    #[test]
    fn pass_through_silences_extra_channels() {
        let output = remap(RemapMode::PassThrough, 3);
        assert_eq!(last_frame(&output), vec![1.0, 3.0, 0.0]);
    }

    #[test]
    fn stereo_to_mono_averages() {
        let output = remap(RemapMode::StereoToMono, 2);
        assert_eq!(last_frame(&output), vec![2.0, 2.0]);
    }

    #[test]
    fn single_side_to_mono() {
        assert_eq!(last_frame(&remap(RemapMode::LeftToMono, 1)), vec![1.0]);
        assert_eq!(last_frame(&remap(RemapMode::RightToMono, 1)), vec![3.0]);
    }

    #[test]
    fn arbitrary_map() {
        let output = remap(RemapMode::Map(vec![1, 1, 0]), 3);
        assert_eq!(last_frame(&output), vec![3.0, 3.0, 1.0]);
    }

    #[test]
    fn gains_apply_per_output_channel() {
        let (context, _io) = create_engine(EngineOptions::default());
        let source = Node::new(&context, Constant::new(1.0));
        let mut remapper =
            ChannelRemapper::new(&context, &source, RemapMode::LeftToMono, 2).unwrap();
        remapper.set_gain(1, 0.5).unwrap();
        assert!(matches!(
            remapper.set_gain(2, 0.5),
            Err(GraphError::OutOfRange(_))
        ));

        let remapper = Node::new(&context, remapper);
        let mut output = OwnedAudioBuffer::new(4, 2, 44_100);
        remapper
            .next_buffer(&mut ProcessContext::new(&mut output, 1))
            .unwrap();

        assert_eq!(last_frame(&output), vec![1.0, 0.5]);
    }

    #[test]
    fn map_length_must_match_the_output() {
        let (context, _io) = create_engine(EngineOptions::default());
        let source = Node::new(&context, Constant::new(1.0));
        let result = ChannelRemapper::new(&context, &source, RemapMode::Map(vec![0]), 2);
        assert!(matches!(result, Err(GraphError::Value(_))));
    }
}
