use crate::SampleLocation;

/// Planar multichannel sample storage
///
/// Every channel is a contiguous run of `frame_count()` samples. Implementations
/// either own their storage ([crate::OwnedAudioBuffer]) or borrow it from somewhere
/// else ([crate::BorrowedAudioBuffer], [crate::MutableBorrowedAudioBuffer])
pub trait AudioBuffer {
    fn fill_from_interleaved(
        &mut self,
        interleaved_data: &[f32],
        channel_count: usize,
        frame_count: usize,
    ) {
        let frame_count = frame_count.min(self.frame_count());
        let copied_channels = channel_count.min(self.channel_count());

        for channel in 0..copied_channels {
            let channel_data = self.get_channel_data_mut(SampleLocation::channel(channel));

            (0..frame_count).for_each(|frame| {
                let source_offset = frame * channel_count + channel;
                channel_data[frame] = interleaved_data[source_offset];
            });
        }
    }

    fn copy_to_interleaved(
        &self,
        interleaved_data: &mut [f32],
        channel_count: usize,
        frame_count: usize,
    ) {
        let copied_channels = channel_count.min(self.channel_count());
        let frame_count = frame_count.min(self.frame_count());

        for channel in 0..copied_channels {
            let channel_data = self.get_channel_data(SampleLocation::channel(channel));

            (0..frame_count).for_each(|frame| {
                let destination_offset = frame * channel_count + channel;
                interleaved_data[destination_offset] = channel_data[frame];
            });
        }
    }

    fn channel_count(&self) -> usize;

    fn frame_count(&self) -> usize;

    fn sample_rate(&self) -> usize;

    fn clear(&mut self) {
        self.fill_with_value(0.0_f32);
    }

    fn fill_channel_with_value(&mut self, channel: usize, value: f32) {
        let data = self.get_channel_data_mut(SampleLocation::channel(channel));
        data.fill(value);
    }

    fn fill_with_value(&mut self, value: f32) {
        for channel in 0..self.channel_count() {
            self.fill_channel_with_value(channel, value);
        }
    }

    fn channel_is_silent(&self, channel: usize) -> bool {
        let data = self.get_channel_data(SampleLocation::channel(channel));
        data.iter().all(|sample| *sample == 0.0_f32)
    }

    /// The samples of a channel, starting at `sample_location`
    fn get_channel_data(&self, sample_location: SampleLocation) -> &[f32];

    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32];

    fn set_sample(&mut self, sample_location: SampleLocation, value: f32) {
        let data = self.get_channel_data_mut(sample_location);
        data[0] = value;
    }

    fn add_sample(&mut self, sample_location: SampleLocation, value: f32) {
        let data = self.get_channel_data_mut(sample_location);
        data[0] += value;
    }

    fn get_sample(&self, sample_location: SampleLocation) -> f32 {
        let data = self.get_channel_data(sample_location);
        data[0]
    }

    fn add_from(
        &mut self,
        source_buffer: &dyn AudioBuffer,
        source_location: SampleLocation,
        destination_location: SampleLocation,
        channel_count: usize,
        frame_count: usize,
    ) {
        for channel in 0..channel_count {
            let source = source_buffer.get_channel_data(source_location.offset_channels(channel));
            let source = &source[..frame_count];

            let destination =
                self.get_channel_data_mut(destination_location.offset_channels(channel));
            let destination = &mut destination[..frame_count];

            for (source_value, destination_value) in source.iter().zip(destination.iter_mut()) {
                *destination_value += *source_value;
            }
        }
    }

    fn copy_from(
        &mut self,
        source_buffer: &dyn AudioBuffer,
        source_location: SampleLocation,
        destination_location: SampleLocation,
        channel_count: usize,
        frame_count: usize,
    ) {
        for channel in 0..channel_count {
            let source = source_buffer.get_channel_data(source_location.offset_channels(channel));
            let source = &source[..frame_count];

            let destination =
                self.get_channel_data_mut(destination_location.offset_channels(channel));
            let destination = &mut destination[..frame_count];

            destination.copy_from_slice(source);
        }
    }

    fn frame_iter(&self) -> FrameIterator {
        FrameIterator {
            channel: 0,
            frame: 0,
            channel_count: self.channel_count(),
            frame_count: self.frame_count(),
        }
    }

    /// Copy `frame_count` frames from `source` to another channel of this buffer
    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize);
}

pub struct FrameIterator {
    channel: usize,
    frame: usize,
    channel_count: usize,
    frame_count: usize,
}

impl Iterator for FrameIterator {
    type Item = SampleLocation;

    fn next(&mut self) -> Option<Self::Item> {
        let location = if self.channel < self.channel_count && self.frame < self.frame_count {
            Some(SampleLocation::new(self.channel, self.frame))
        } else {
            None
        };

        self.frame += 1;

        if self.frame >= self.frame_count {
            self.channel += 1;
            self.frame = 0;
        }

        location
    }
}
