use crate::{AudioBuffer, SampleLocation};

/// A logical N-channel view of a wider buffer
///
/// Logical channel `i` is backed by channel `channel_map[i]` of the underlying buffer.
/// Several logical channels may share the same real channel.
pub struct ChannelMappedBuffer<'a> {
    buffer: &'a mut dyn AudioBuffer,
    channel_map: &'a [usize],
}

impl<'a> ChannelMappedBuffer<'a> {
    /// Create a mapped view
    ///
    /// Returns `None` if the map refers to a channel the buffer doesn't have
    pub fn new(buffer: &'a mut dyn AudioBuffer, channel_map: &'a [usize]) -> Option<Self> {
        let real_channel_count = buffer.channel_count();

        if channel_map
            .iter()
            .any(|channel| *channel >= real_channel_count)
        {
            return None;
        }

        Some(Self {
            buffer,
            channel_map,
        })
    }

    /// The number of channels of the underlying buffer
    pub fn real_channel_count(&self) -> usize {
        self.buffer.channel_count()
    }

    fn real_location(&self, sample_location: SampleLocation) -> SampleLocation {
        sample_location.with_channel(self.channel_map[sample_location.channel])
    }
}

impl AudioBuffer for ChannelMappedBuffer<'_> {
    fn channel_count(&self) -> usize {
        self.channel_map.len()
    }

    fn frame_count(&self) -> usize {
        self.buffer.frame_count()
    }

    fn sample_rate(&self) -> usize {
        self.buffer.sample_rate()
    }

    fn get_channel_data(&self, sample_location: SampleLocation) -> &[f32] {
        self.buffer
            .get_channel_data(self.real_location(sample_location))
    }

    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32] {
        let location = self.real_location(sample_location);
        self.buffer.get_channel_data_mut(location)
    }

    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize) {
        let source = self.real_location(source);
        let to_channel = self.channel_map[to_channel];

        if source.channel != to_channel {
            self.buffer
                .duplicate_channel(source, to_channel, frame_count);
        }
    }
}
