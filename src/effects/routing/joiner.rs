use crate::{
    Context, DspProcessor, GraphError, GraphNode, GraphResult, MutableBorrowedAudioBuffer,
    ProcessContext,
};

/// Interleaves several mono inputs into one multichannel stream
///
/// Input `i` becomes channel `i`. The output width must match the input count.
pub struct Joiner {
    inputs: Vec<GraphNode>,
}

impl Joiner {
    pub fn new(
        _context: &Context,
        inputs: impl IntoIterator<Item = impl Into<GraphNode>>,
    ) -> Self {
        let mut joiner = Self { inputs: Vec::new() };
        for input in inputs {
            joiner.add_input(input);
        }
        joiner
    }

    pub fn add_input(&mut self, input: impl Into<GraphNode>) {
        let input = input.into();
        input.add_output();
        self.inputs.push(input);
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }
}

impl Drop for Joiner {
    fn drop(&mut self) {
        for input in self.inputs.drain(..) {
            input.remove_output();
        }
    }
}

impl DspProcessor for Joiner {
    fn channel_count(&self) -> usize {
        self.inputs.len()
    }

    fn is_active(&self) -> bool {
        self.inputs.iter().any(|input| input.is_active())
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        if context.channel_count() != self.inputs.len() {
            return Err(GraphError::Logic(format!(
                "a joiner of {} inputs can't fill {} channels",
                self.inputs.len(),
                context.channel_count()
            )));
        }

        for (channel, input) in self.inputs.iter().enumerate() {
            let sequence = context.sequence;
            let mut channel_buffer = MutableBorrowedAudioBuffer::slice_channels(
                &mut *context.output_buffer,
                channel,
                1,
            );
            input.next_buffer(&mut ProcessContext::new(&mut channel_buffer, sequence))?;
        }

        Ok(())
    }
}
