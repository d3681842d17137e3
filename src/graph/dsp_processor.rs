use crate::{GraphResult, ProcessContext, SampleLocation};

/// How a node fills a request for more channels than it computes itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Compute the first channel and copy it into every other requested channel
    Copy,

    /// Compute every requested channel separately
    Expand,

    /// Compute only the channels the node declares and leave the rest to the caller
    Ignore,
}

/// The node-specific part of a unit generator
///
/// Most nodes only implement [DspProcessor::process_channel] and let the default
/// [DspProcessor::process_audio] dispatch on their [CopyPolicy]. Nodes that produce all
/// their channels together (mixers, panners, filters) override `process_audio` instead.
pub trait DspProcessor: Send {
    /// The number of channels the node produces natively
    fn channel_count(&self) -> usize {
        1
    }

    fn copy_policy(&self) -> CopyPolicy {
        CopyPolicy::Copy
    }

    /// Whether the node still has signal to produce
    fn is_active(&self) -> bool {
        true
    }

    /// Pull any control inputs for the coming block
    fn prepare_block(&mut self, _frame_count: usize, _sequence: u64) -> GraphResult<()> {
        Ok(())
    }

    /// Compute one channel of the next block
    fn process_channel(&mut self, output: &mut [f32], _channel: usize) -> GraphResult<()> {
        output.fill(0.0);
        Ok(())
    }

    /// Compute the next block
    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let frame_count = context.frame_count();
        let channel_count = context.channel_count();

        self.prepare_block(frame_count, context.sequence)?;

        if channel_count == 0 {
            return Ok(());
        }

        match self.copy_policy() {
            CopyPolicy::Copy => {
                let first_channel = context
                    .output_buffer
                    .get_channel_data_mut(SampleLocation::channel(0));
                self.process_channel(first_channel, 0)?;

                for channel in 1..channel_count {
                    context.output_buffer.duplicate_channel(
                        SampleLocation::channel(0),
                        channel,
                        frame_count,
                    );
                }
            }
            CopyPolicy::Expand => {
                for channel in 0..channel_count {
                    let output = context
                        .output_buffer
                        .get_channel_data_mut(SampleLocation::channel(channel));
                    self.process_channel(output, channel)?;
                }
            }
            CopyPolicy::Ignore => {
                for channel in 0..channel_count.min(self.channel_count()) {
                    let output = context
                        .output_buffer
                        .get_channel_data_mut(SampleLocation::channel(channel));
                    self.process_channel(output, channel)?;
                }
            }
        }

        Ok(())
    }
}
