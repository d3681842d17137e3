use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation};

/// A ring of recently computed frames, replayed to every consumer after the first
///
/// A replay rewinds from the write head by the requested frame count, so every consumer
/// of a node must ask for the same block size within one IO cycle.
///
/// The cache keeps as many channels as the block that was written, which can be wider
/// than the node's declared channel count when the node expands to its consumer.
pub struct FanOutCache {
    buffer: OwnedAudioBuffer,
    write_position: usize,
    cached_channels: usize,
}

impl FanOutCache {
    pub fn new(channel_count: usize, capacity: usize, sample_rate: usize) -> Self {
        Self {
            buffer: OwnedAudioBuffer::new(capacity.max(1), channel_count.max(1), sample_rate),
            write_position: 0,
            cached_channels: 0,
        }
    }

    /// Channels the ring can hold without reallocating
    pub fn channel_capacity(&self) -> usize {
        self.buffer.channel_count()
    }

    /// Channels held by the most recent write
    pub fn cached_channels(&self) -> usize {
        self.cached_channels
    }

    fn grow(&mut self, channel_count: usize) {
        log::debug!(
            "Growing fan-out cache from {} to {channel_count} channels",
            self.buffer.channel_count()
        );

        self.buffer = OwnedAudioBuffer::new(
            self.buffer.frame_count(),
            channel_count,
            self.buffer.sample_rate(),
        );
        self.write_position = 0;
    }

    /// Append a freshly computed block
    pub fn write(&mut self, source: &dyn AudioBuffer) {
        if source.channel_count() > self.buffer.channel_count() {
            self.grow(source.channel_count());
        }

        let capacity = self.buffer.frame_count();
        let frame_count = source.frame_count().min(capacity);
        let channel_count = source.channel_count();
        self.cached_channels = channel_count;

        let first_part = frame_count.min(capacity - self.write_position);
        let second_part = frame_count - first_part;

        self.buffer.copy_from(
            source,
            SampleLocation::origin(),
            SampleLocation::frame(self.write_position),
            channel_count,
            first_part,
        );

        if second_part > 0 {
            self.buffer.copy_from(
                source,
                SampleLocation::frame(first_part),
                SampleLocation::origin(),
                channel_count,
                second_part,
            );
        }

        self.write_position = (self.write_position + frame_count) % capacity;
    }

    /// Copy the last `destination.frame_count()` frames into `destination`
    ///
    /// Destination channels beyond the cached ones repeat the last cached channel.
    pub fn replay(&self, destination: &mut dyn AudioBuffer) {
        if self.cached_channels == 0 {
            destination.clear();
            return;
        }

        let capacity = self.buffer.frame_count();
        let frame_count = destination.frame_count().min(capacity);
        let read_position = (self.write_position + capacity - frame_count) % capacity;

        let first_part = frame_count.min(capacity - read_position);
        let second_part = frame_count - first_part;
        let last_cached_channel = self.cached_channels - 1;

        for channel in 0..destination.channel_count() {
            let source_channel = channel.min(last_cached_channel);

            destination.copy_from(
                &self.buffer,
                SampleLocation::new(source_channel, read_position),
                SampleLocation::channel(channel),
                1,
                first_part,
            );

            if second_part > 0 {
                destination.copy_from(
                    &self.buffer,
                    SampleLocation::channel(source_channel),
                    SampleLocation::new(channel, first_part),
                    1,
                    second_part,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(start: f32, frame_count: usize) -> OwnedAudioBuffer {
        let samples = (0..frame_count).map(|frame| start + frame as f32).collect();
        OwnedAudioBuffer::from_channels(&[samples], 44_100)
    }

    #[test]
    fn replays_the_last_block() {
        let mut cache = FanOutCache::new(1, 16, 44_100);
        cache.write(&ramp(0.0, 4));
        cache.write(&ramp(100.0, 4));

        let mut destination = OwnedAudioBuffer::new(4, 1, 44_100);
        cache.replay(&mut destination);

        assert_eq!(
            destination.get_channel_data(SampleLocation::origin()),
            &[100.0, 101.0, 102.0, 103.0]
        );
    }

    #[test]
    fn replays_across_the_wrap_point() {
        let mut cache = FanOutCache::new(1, 10, 44_100);
        cache.write(&ramp(0.0, 6));
        cache.write(&ramp(50.0, 6));

        let mut destination = OwnedAudioBuffer::new(6, 1, 44_100);
        cache.replay(&mut destination);

        assert_eq!(
            destination.get_channel_data(SampleLocation::origin()),
            &[50.0, 51.0, 52.0, 53.0, 54.0, 55.0]
        );
    }

    #[test]
    fn extra_destination_channels_repeat_the_last_cached_channel() {
        let mut cache = FanOutCache::new(1, 8, 44_100);
        cache.write(&ramp(1.0, 2));

        let mut destination = OwnedAudioBuffer::new(2, 3, 44_100);
        cache.replay(&mut destination);

        for channel in 0..3 {
            assert_eq!(
                destination.get_channel_data(SampleLocation::channel(channel)),
                &[1.0, 2.0]
            );
        }
    }

    #[test]
    fn wider_blocks_grow_the_ring_and_keep_every_channel() {
        let mut cache = FanOutCache::new(1, 8, 44_100);
        let block = OwnedAudioBuffer::from_channels(&[vec![1.0, 2.0], vec![3.0, 4.0]], 44_100);
        cache.write(&block);

        assert_eq!(cache.cached_channels(), 2);
        assert!(cache.channel_capacity() >= 2);

        let mut destination = OwnedAudioBuffer::new(2, 2, 44_100);
        cache.replay(&mut destination);

        assert_eq!(
            destination.get_channel_data(SampleLocation::channel(0)),
            &[1.0, 2.0]
        );
        assert_eq!(
            destination.get_channel_data(SampleLocation::channel(1)),
            &[3.0, 4.0]
        );
    }
}
