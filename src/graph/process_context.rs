use crate::AudioBuffer;

/// A single request for a block of audio
pub struct ProcessContext<'a> {
    /// The buffer to fill, already sized to the channel and frame count the caller wants
    pub output_buffer: &'a mut dyn AudioBuffer,

    /// The IO cycle this request belongs to
    pub sequence: u64,
}

impl<'a> ProcessContext<'a> {
    pub fn new(output_buffer: &'a mut dyn AudioBuffer, sequence: u64) -> Self {
        Self {
            output_buffer,
            sequence,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.output_buffer.frame_count()
    }

    pub fn channel_count(&self) -> usize {
        self.output_buffer.channel_count()
    }
}
