use crate::{AudioBuffer, SampleLocation, SampleRange};

/// A mutable buffer that refers to a portion of another buffer
///
/// This is the shallow copy of a buffer: it shares the samples and never frees them.
pub struct MutableBorrowedAudioBuffer<'a> {
    buffer: &'a mut dyn AudioBuffer,
    range: SampleRange,
}

impl<'a> MutableBorrowedAudioBuffer<'a> {
    /// Create a slice of another audio buffer with a subset of frames
    pub fn slice_frames(
        buffer: &'a mut dyn AudioBuffer,
        frame_offset: usize,
        frame_count: usize,
    ) -> Self {
        let channel_count = buffer.channel_count();
        Self::slice(
            buffer,
            SampleRange::new(0, frame_offset, channel_count, frame_count),
        )
    }

    /// Create a slice of another audio buffer with a subset of channels
    pub fn slice_channels(
        buffer: &'a mut dyn AudioBuffer,
        channel_offset: usize,
        channel_count: usize,
    ) -> Self {
        let frame_count = buffer.frame_count();
        Self::slice(
            buffer,
            SampleRange::new(channel_offset, 0, channel_count, frame_count),
        )
    }

    /// Create a slice of another audio buffer with a subset of channels and frames
    pub fn slice(buffer: &'a mut dyn AudioBuffer, range: SampleRange) -> Self {
        assert!(range.fits_within(buffer.channel_count(), buffer.frame_count()));
        Self { buffer, range }
    }
}

impl AudioBuffer for MutableBorrowedAudioBuffer<'_> {
    fn channel_count(&self) -> usize {
        self.range.channel_count
    }

    fn frame_count(&self) -> usize {
        self.range.frame_count
    }

    fn sample_rate(&self) -> usize {
        self.buffer.sample_rate()
    }

    fn get_channel_data(&self, sample_location: SampleLocation) -> &[f32] {
        let data = self.buffer.get_channel_data(
            sample_location
                .offset_frames(self.range.frame)
                .offset_channels(self.range.channel),
        );
        let end = self.range.frame_count - sample_location.frame;
        &data[0..end]
    }

    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32] {
        let data = self.buffer.get_channel_data_mut(
            sample_location
                .offset_frames(self.range.frame)
                .offset_channels(self.range.channel),
        );
        let end = self.range.frame_count - sample_location.frame;
        &mut data[0..end]
    }

    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize) {
        self.buffer.duplicate_channel(
            source
                .offset_frames(self.range.frame)
                .offset_channels(self.range.channel),
            to_channel + self.range.channel,
            frame_count,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OwnedAudioBuffer;
    use approx::assert_relative_eq;

    #[test]
    fn translates_location_when_getting_samples() {
        let mut original_buffer = OwnedAudioBuffer::new(1_000, 2, 44_100);

        let location = SampleLocation::new(0, 54);
        original_buffer.set_sample(location, 0.54);

        let slice_offset = 50;
        let slice = MutableBorrowedAudioBuffer::slice_frames(&mut original_buffer, slice_offset, 100);

        let expected_location = SampleLocation::new(0, 54 - slice_offset);
        assert_relative_eq!(slice.get_sample(expected_location), 0.54);
    }

    #[test]
    fn translates_location_when_setting_samples() {
        let mut original_buffer = OwnedAudioBuffer::new(1_000, 2, 44_100);

        let slice_offset = 50;
        let mut slice =
            MutableBorrowedAudioBuffer::slice_frames(&mut original_buffer, slice_offset, 100);

        slice.set_sample(SampleLocation::new(0, 12), 0.12);

        let original_location = SampleLocation::new(0, 12 + slice_offset);
        assert_relative_eq!(original_buffer.get_sample(original_location), 0.12);
    }

    #[test]
    fn channel_slice_only_exposes_its_channels() {
        let mut original_buffer = OwnedAudioBuffer::new(16, 4, 44_100);

        {
            let mut slice = MutableBorrowedAudioBuffer::slice_channels(&mut original_buffer, 2, 2);
            assert_eq!(slice.channel_count(), 2);
            slice.fill_with_value(1.0);
        }

        assert!(original_buffer.channel_is_silent(0));
        assert!(original_buffer.channel_is_silent(1));
        assert!(!original_buffer.channel_is_silent(2));
        assert!(!original_buffer.channel_is_silent(3));
    }
}
