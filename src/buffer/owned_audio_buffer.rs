use crate::{AudioBuffer, GraphError, GraphResult, SampleLocation};
use rand::Rng;

/// An audio buffer that owns its samples
///
/// The shape can be declared before any storage exists ([OwnedAudioBuffer::unallocated]
/// and [OwnedAudioBuffer::set_size]); storage is created by [OwnedAudioBuffer::allocate].
/// Once allocated, the buffer can be reshaped in place as long as the new shape fits in
/// the allocation, which is what happens on the audio thread.
///
/// Every channel occupies `capacity` samples of one contiguous allocation, so either
/// all channels are allocated or none are.
#[repr(align(64))]
#[derive(Clone, Debug)]
pub struct OwnedAudioBuffer {
    data: Vec<f32>,
    channel_count: usize,
    frame_count: usize,
    allocated: bool,
    allocated_channels: usize,
    capacity: usize,
    sample_rate: usize,
    sequence: u64,
    populated: bool,
}

impl OwnedAudioBuffer {
    /// Create an allocated, silent buffer
    pub fn new(frame_count: usize, channel_count: usize, sample_rate: usize) -> Self {
        Self {
            data: vec![0.0; frame_count * channel_count],
            channel_count,
            frame_count,
            allocated: true,
            allocated_channels: channel_count,
            capacity: frame_count,
            sample_rate,
            sequence: 0,
            populated: false,
        }
    }

    /// Declare a shape without allocating any storage
    pub fn unallocated(frame_count: usize, channel_count: usize, sample_rate: usize) -> Self {
        Self {
            data: Vec::new(),
            channel_count,
            frame_count,
            allocated: false,
            allocated_channels: 0,
            capacity: 0,
            sample_rate,
            sequence: 0,
            populated: false,
        }
    }

    /// Copy another buffer into a new owned buffer
    pub fn from_buffer(buffer: &dyn AudioBuffer) -> Self {
        let mut new_buffer = Self::new(
            buffer.frame_count(),
            buffer.channel_count(),
            buffer.sample_rate(),
        );

        new_buffer.copy_from(
            buffer,
            SampleLocation::origin(),
            SampleLocation::origin(),
            buffer.channel_count(),
            buffer.frame_count(),
        );

        new_buffer
    }

    /// Create a buffer from one vector of samples per channel
    pub fn from_channels(channels: &[Vec<f32>], sample_rate: usize) -> Self {
        let frame_count = channels.iter().map(|channel| channel.len()).max().unwrap_or(0);
        let mut buffer = Self::new(frame_count, channels.len(), sample_rate);

        for (index, channel) in channels.iter().enumerate() {
            let destination = buffer.get_channel_data_mut(SampleLocation::channel(index));
            destination[..channel.len()].copy_from_slice(channel);
        }

        buffer
    }

    /// A buffer of uniformly distributed noise in the range [-1, 1]
    pub fn white_noise(frame_count: usize, channel_count: usize, sample_rate: usize) -> Self {
        let mut buffer = Self::new(frame_count, channel_count, sample_rate);

        let mut random_generator = rand::rng();

        for location in buffer.frame_iter() {
            let sample_value = random_generator.random_range(-1.0..=1.0);
            buffer.set_sample(location, sample_value);
        }

        buffer
    }

    /// A buffer containing a sine wave, duplicated across all channels
    pub fn sine(
        frame_count: usize,
        channel_count: usize,
        sample_rate: usize,
        frequency: f64,
        amplitude: f64,
    ) -> Self {
        debug_assert!(channel_count > 0);

        let mut buffer = Self::new(frame_count, channel_count, sample_rate);

        let channel = buffer.get_channel_data_mut(SampleLocation::origin());

        for (index, sample) in channel.iter_mut().enumerate() {
            let time = index as f64 / sample_rate as f64;
            *sample = (amplitude * (std::f64::consts::TAU * frequency * time).sin()) as f32;
        }

        for channel in 1..channel_count {
            buffer.duplicate_channel(SampleLocation::channel(0), channel, frame_count);
        }

        buffer
    }

    /// Declare a new shape
    ///
    /// If the shape no longer fits the current allocation the storage is released and
    /// [OwnedAudioBuffer::allocate] must be called again.
    pub fn set_size(&mut self, channel_count: usize, frame_count: usize) {
        if !self.fits_in_place(channel_count, frame_count) {
            self.free();
        }

        self.channel_count = channel_count;
        self.frame_count = frame_count;
    }

    /// Change the shape without touching the allocation
    ///
    /// Fails if the new shape is larger than the storage, which would require
    /// allocating on the audio thread.
    pub fn reshape(&mut self, channel_count: usize, frame_count: usize) -> GraphResult<()> {
        if !self.is_allocated() || !self.fits_in_place(channel_count, frame_count) {
            return Err(GraphError::RunTime(format!(
                "can't reshape a buffer of {} x {} to {} x {} at run-time",
                self.allocated_channels, self.capacity, channel_count, frame_count
            )));
        }

        self.channel_count = channel_count;
        self.frame_count = frame_count;
        Ok(())
    }

    /// Allocate zeroed storage for the declared shape
    ///
    /// Does nothing if the current allocation already fits.
    pub fn allocate(&mut self) -> GraphResult<()> {
        if self.is_allocated() && self.fits_in_place(self.channel_count, self.frame_count) {
            return Ok(());
        }

        let sample_count = self.channel_count * self.frame_count;

        let mut data = Vec::new();
        data.try_reserve_exact(sample_count).map_err(|error| {
            GraphError::Memory(format!(
                "failed to allocate {} x {} samples: {error}",
                self.channel_count, self.frame_count
            ))
        })?;
        data.resize(sample_count, 0.0);

        self.data = data;
        self.allocated = true;
        self.allocated_channels = self.channel_count;
        self.capacity = self.frame_count;
        Ok(())
    }

    /// Release the storage, keeping the declared shape
    pub fn free(&mut self) {
        self.data = Vec::new();
        self.allocated = false;
        self.allocated_channels = 0;
        self.capacity = 0;
        self.populated = false;
    }

    /// Whether storage exists for the declared shape
    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// The number of frames each channel can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn channel_capacity(&self) -> usize {
        self.allocated_channels
    }

    /// Deep copy samples from another buffer
    ///
    /// The source must fit inside the current shape; the destination is left untouched
    /// if it doesn't.
    pub fn copy_samples_from(&mut self, source: &dyn AudioBuffer) -> GraphResult<()> {
        if source.channel_count() > self.channel_count || source.frame_count() > self.frame_count
        {
            return Err(GraphError::RunTime(format!(
                "can't reallocate buffers at run-time: source is {} x {}, destination is {} x {}",
                source.channel_count(),
                source.frame_count(),
                self.channel_count,
                self.frame_count
            )));
        }

        if !self.is_allocated() {
            return Err(GraphError::Logic(
                "copying samples into an unallocated buffer".to_string(),
            ));
        }

        self.copy_from(
            source,
            SampleLocation::origin(),
            SampleLocation::origin(),
            source.channel_count(),
            source.frame_count(),
        );

        Ok(())
    }

    /// The sequence number of the block last written into this buffer
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Whether the buffer holds a computed block
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn set_populated(&mut self, populated: bool) {
        self.populated = populated;
    }

    /// Average all channels into the first channel and drop the others
    pub fn merge_to_mono(&mut self) {
        let channel_count = self.channel_count;
        if channel_count < 2 || !self.allocated {
            return;
        }

        for channel in 1..channel_count {
            let start = channel * self.capacity;
            for frame in 0..self.frame_count {
                let sample = self.data[start + frame];
                self.data[frame] += sample;
            }
        }

        let scale = 1.0 / channel_count as f32;
        self.data[..self.frame_count]
            .iter_mut()
            .for_each(|sample| *sample *= scale);

        self.channel_count = 1;
    }

    fn fits_in_place(&self, channel_count: usize, frame_count: usize) -> bool {
        channel_count <= self.allocated_channels && frame_count <= self.capacity
    }

    fn get_sample_location_bounds(&self, sample_location: &SampleLocation) -> (usize, usize) {
        let channel_start = sample_location.channel * self.capacity;
        let start = channel_start + sample_location.frame.min(self.frame_count);
        let end = channel_start + self.frame_count;
        (start, end)
    }
}

impl AudioBuffer for OwnedAudioBuffer {
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
        self.data.get(start..end).unwrap_or_default()
    }

    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32] {
        let (start, end) = self.get_sample_location_bounds(&sample_location);
        self.data.get_mut(start..end).unwrap_or_default()
    }

    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize) {
        let (source_start, _) = self.get_sample_location_bounds(&source);
        let (destination_start, _) =
            self.get_sample_location_bounds(&source.with_channel(to_channel));

        debug_assert!(
            (source_start + frame_count <= destination_start)
                || (destination_start + frame_count <= source_start)
        );

        self.data
            .copy_within(source_start..source_start + frame_count, destination_start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn random_sample() -> f32 {
        let mut generator = rand::rng();
        generator.random_range(-1.0_f32..=1.0_f32)
    }

    fn fill_with_noise(buffer: &mut dyn AudioBuffer) {
        for channel in 0..buffer.channel_count() {
            for frame in 0..buffer.frame_count() {
                buffer.set_sample(SampleLocation::new(channel, frame), random_sample());
            }
        }
    }

    fn is_empty(buffer: &dyn AudioBuffer) -> bool {
        (0..buffer.channel_count()).all(|channel| {
            buffer
                .get_channel_data(SampleLocation::channel(channel))
                .iter()
                .all(|value| value.abs() < 1e-6)
        })
    }

    #[test]
    fn starts_empty() {
        let buffer = OwnedAudioBuffer::new(1000, 2, 44100);
        assert!(is_empty(&buffer));
        assert!(buffer.is_allocated());
    }

    #[test]
    fn clear_resets_all_samples() {
        let mut buffer = OwnedAudioBuffer::new(1000, 2, 44100);

        fill_with_noise(&mut buffer);
        assert!(!is_empty(&buffer));
        buffer.clear();
        assert!(is_empty(&buffer));
    }

    #[test]
    fn set_and_get_a_sample() {
        let mut buffer = OwnedAudioBuffer::new(1000, 2, 44100);

        let location = SampleLocation::new(1, 53);

        let expected_sample = random_sample();
        buffer.set_sample(location, expected_sample);

        assert_eq!(expected_sample, buffer.get_sample(location));
    }

    #[test]
    fn set_size_declares_without_allocating() {
        let mut buffer = OwnedAudioBuffer::unallocated(0, 0, 44100);
        buffer.set_size(2, 128);

        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 128);
        assert!(!buffer.is_allocated());
        assert!(buffer.get_channel_data(SampleLocation::channel(1)).is_empty());

        buffer.allocate().unwrap();
        assert!(buffer.is_allocated());
        assert_eq!(buffer.get_channel_data(SampleLocation::channel(1)).len(), 128);
        assert!(is_empty(&buffer));
    }

    #[test]
    fn shrinking_keeps_the_allocation() {
        let mut buffer = OwnedAudioBuffer::new(512, 2, 44100);
        buffer.set_sample(SampleLocation::new(1, 3), 0.25);

        buffer.set_size(2, 64);
        assert!(buffer.is_allocated());
        assert_eq!(buffer.capacity(), 512);
        assert_relative_eq!(buffer.get_sample(SampleLocation::new(1, 3)), 0.25);
    }

    #[test]
    fn growing_releases_the_allocation() {
        let mut buffer = OwnedAudioBuffer::new(64, 1, 44100);
        buffer.set_size(2, 64);
        assert!(!buffer.is_allocated());

        buffer.allocate().unwrap();
        assert_eq!(buffer.channel_count(), 2);
        assert!(is_empty(&buffer));
    }

    #[test]
    fn reshape_beyond_capacity_is_a_run_time_error() {
        let mut buffer = OwnedAudioBuffer::new(64, 2, 44100);
        assert!(buffer.reshape(1, 32).is_ok());
        assert_eq!(buffer.channel_count(), 1);

        let result = buffer.reshape(2, 128);
        assert!(matches!(result, Err(GraphError::RunTime(_))));
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.frame_count(), 32);
    }

    #[test]
    fn copy_samples_from_a_larger_buffer_fails_and_leaves_destination_unchanged() {
        let mut destination = OwnedAudioBuffer::new(16, 1, 44100);
        destination.fill_with_value(0.5);

        let source = OwnedAudioBuffer::white_noise(32, 1, 44100);

        let result = destination.copy_samples_from(&source);
        assert!(matches!(result, Err(GraphError::RunTime(_))));
        assert!(destination
            .get_channel_data(SampleLocation::origin())
            .iter()
            .all(|sample| *sample == 0.5));
    }

    #[test]
    fn copy_samples_from_copies_deeply() {
        let mut destination = OwnedAudioBuffer::new(32, 2, 44100);
        let mut source = OwnedAudioBuffer::new(32, 2, 44100);
        fill_with_noise(&mut source);

        destination.copy_samples_from(&source).unwrap();
        let expected = source.get_sample(SampleLocation::new(1, 7));

        source.clear();
        assert_relative_eq!(destination.get_sample(SampleLocation::new(1, 7)), expected);
    }

    #[test]
    fn free_releases_storage() {
        let mut buffer = OwnedAudioBuffer::new(64, 2, 44100);
        buffer.free();
        assert!(!buffer.is_allocated());
        assert_eq!(buffer.channel_count(), 2);
    }

    #[test]
    fn merge_to_mono_averages_channels() {
        let mut buffer = OwnedAudioBuffer::from_channels(&[vec![1.0, 0.0], vec![0.0, 1.0]], 44100);
        buffer.merge_to_mono();

        assert_eq!(buffer.channel_count(), 1);
        assert_relative_eq!(buffer.get_sample(SampleLocation::frame(0)), 0.5);
        assert_relative_eq!(buffer.get_sample(SampleLocation::frame(1)), 0.5);
    }
}
