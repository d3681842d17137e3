use crate::{AudioBuffer, SampleLocation};

/// A planar view over sample memory owned by someone else
///
/// Typically wraps the arrays a host audio callback hands over. The samples are laid
/// out channel after channel, each `frame_count` long. Dropping the view leaves the
/// memory untouched.
pub struct BorrowedAudioBuffer<'a> {
    data: &'a mut [f32],
    channel_count: usize,
    frame_count: usize,
    sample_rate: usize,
}

impl<'a> BorrowedAudioBuffer<'a> {
    /// Wrap planar data holding `channel_count` channels
    pub fn planar(data: &'a mut [f32], channel_count: usize, sample_rate: usize) -> Self {
        let frame_count = if channel_count == 0 {
            0
        } else {
            data.len() / channel_count
        };

        Self {
            data,
            channel_count,
            frame_count,
            sample_rate,
        }
    }

    fn get_sample_location_bounds(&self, sample_location: &SampleLocation) -> (usize, usize) {
        let channel_start = sample_location.channel * self.frame_count;
        let start = channel_start + sample_location.frame.min(self.frame_count);
        let end = channel_start + self.frame_count;
        (start, end)
    }
}

impl AudioBuffer for BorrowedAudioBuffer<'_> {
    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    fn get_channel_data(&self, sample_location: SampleLocation) -> &[f32] {
        let (start, end) = self.get_sample_location_bounds(&sample_location);
        &self.data[start..end]
    }

    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32] {
        let (start, end) = self.get_sample_location_bounds(&sample_location);
        &mut self.data[start..end]
    }

    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize) {
        let (source_start, _) = self.get_sample_location_bounds(&source);
        let (destination_start, _) =
            self.get_sample_location_bounds(&source.with_channel(to_channel));

        self.data
            .copy_within(source_start..source_start + frame_count, destination_start);
    }
}
