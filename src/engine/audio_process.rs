use crate::AudioBuffer;

/// An audio process that can be pulled for output samples
pub trait AudioProcess {
    /// Fill `output_buffer` with the next block
    fn process(&mut self, output_buffer: &mut dyn AudioBuffer);
}
