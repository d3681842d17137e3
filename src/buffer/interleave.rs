use crate::{AudioBuffer, SampleLocation};

/// Write a planar buffer into interleaved frames of `channel_count` channels
///
/// Interleaved channels the buffer doesn't have are zeroed.
pub fn interleave(buffer: &dyn AudioBuffer, interleaved_data: &mut [f32], channel_count: usize) {
    let frame_count = buffer.frame_count().min(interleaved_data.len() / channel_count.max(1));

    for channel in buffer.channel_count().min(channel_count)..channel_count {
        (0..frame_count).for_each(|frame| interleaved_data[frame * channel_count + channel] = 0.0);
    }

    buffer.copy_to_interleaved(interleaved_data, channel_count, frame_count);
}

/// Read interleaved frames of `channel_count` channels into a planar buffer
///
/// Buffer channels without an interleaved source are zeroed.
pub fn deinterleave(interleaved_data: &[f32], channel_count: usize, buffer: &mut dyn AudioBuffer) {
    let frame_count = buffer.frame_count().min(interleaved_data.len() / channel_count.max(1));

    for channel in channel_count.min(buffer.channel_count())..buffer.channel_count() {
        buffer.fill_channel_with_value(channel, 0.0);
    }

    buffer.fill_from_interleaved(interleaved_data, channel_count, frame_count);
}

/// Interleave with a channel map
///
/// Interleaved channel `i` takes buffer channel `channel_map[i]`; `None` entries, or
/// entries past the end of the buffer, are zeroed.
pub fn interleave_and_remap(
    buffer: &dyn AudioBuffer,
    interleaved_data: &mut [f32],
    channel_map: &[Option<usize>],
) {
    let channel_count = channel_map.len();
    if channel_count == 0 {
        return;
    }

    let frame_count = buffer.frame_count().min(interleaved_data.len() / channel_count);

    for (channel, source) in channel_map.iter().enumerate() {
        match source.filter(|source| *source < buffer.channel_count()) {
            Some(source) => {
                let source_data = buffer.get_channel_data(SampleLocation::channel(source));
                (0..frame_count).for_each(|frame| {
                    interleaved_data[frame * channel_count + channel] = source_data[frame]
                });
            }
            None => (0..frame_count)
                .for_each(|frame| interleaved_data[frame * channel_count + channel] = 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OwnedAudioBuffer;

    #[test]
    fn extra_interleaved_channels_are_zeroed() {
        let buffer = OwnedAudioBuffer::from_channels(&[vec![1.0, 2.0]], 44_100);
        let mut interleaved = [9.0_f32; 6];

        interleave(&buffer, &mut interleaved, 3);

        assert_eq!(interleaved, [1.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn deinterleave_splits_frames() {
        let interleaved = [1.0, -1.0, 2.0, -2.0];
        let mut buffer = OwnedAudioBuffer::new(2, 3, 44_100);
        buffer.fill_with_value(5.0);

        deinterleave(&interleaved, 2, &mut buffer);

        assert_eq!(buffer.get_channel_data(SampleLocation::channel(0)), &[1.0, 2.0]);
        assert_eq!(buffer.get_channel_data(SampleLocation::channel(1)), &[-1.0, -2.0]);
        assert!(buffer.channel_is_silent(2));
    }

    #[test]
    fn remap_swaps_and_silences_channels() {
        let buffer = OwnedAudioBuffer::from_channels(&[vec![1.0, 1.0], vec![2.0, 2.0]], 44_100);
        let mut interleaved = [9.0_f32; 6];

        interleave_and_remap(&buffer, &mut interleaved, &[Some(1), None, Some(0)]);

        assert_eq!(interleaved, [2.0, 0.0, 1.0, 2.0, 0.0, 1.0]);
    }
}
