use crossbeam::channel::{Receiver, Sender, TrySendError};

use crate::{
    buffer::interleave, AudioBuffer, AudioProcess, EngineOptions, GraphNode, OwnedAudioBuffer,
    ProcessContext,
};

use super::context::IoCommand;

/// The driver-facing root of a graph
///
/// Every call to [AudioProcess::process] starts a new IO cycle: pending root changes
/// are applied, the sequence number is advanced and the root is pulled once. A node
/// failing during the pull is logged and the block is replaced with silence.
pub struct Io {
    root: Option<GraphNode>,
    sequence: u64,
    command_rx: Receiver<IoCommand>,
    garbage_tx: Sender<GraphNode>,
    scratch: OwnedAudioBuffer,
}

impl Io {
    pub(crate) fn new(
        options: &EngineOptions,
        command_rx: Receiver<IoCommand>,
        garbage_tx: Sender<GraphNode>,
    ) -> Self {
        Self {
            root: None,
            sequence: 0,
            command_rx,
            garbage_tx,
            scratch: OwnedAudioBuffer::new(
                options.max_buffer_frames,
                options.output_channel_count.max(1),
                options.sample_rate,
            ),
        }
    }

    /// The sequence number of the last pulled block
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Pull interleaved samples, in blocks no larger than the scratch buffer
    pub fn process_interleaved(&mut self, data: &mut [f32], channel_count: usize) {
        if channel_count == 0 {
            return;
        }

        let block_samples = self.scratch.capacity() * channel_count;

        for chunk in data.chunks_mut(block_samples) {
            let frame_count = chunk.len() / channel_count;

            let mut scratch =
                std::mem::replace(&mut self.scratch, OwnedAudioBuffer::unallocated(0, 0, 0));

            match scratch.reshape(channel_count, frame_count) {
                Ok(()) => {
                    self.process(&mut scratch);
                    interleave(&scratch, chunk, channel_count);
                }
                Err(error) => {
                    log::error!("Can't pull {channel_count} interleaved channels: {error}");
                    chunk.fill(0.0);
                }
            }

            self.scratch = scratch;
        }
    }

    fn process_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            let previous = match command {
                IoCommand::SetRoot(root) => {
                    root.add_output();
                    self.root.replace(root)
                }
                IoCommand::ClearRoot => self.root.take(),
            };

            if let Some(previous) = previous {
                previous.remove_output();
                self.dispose(previous);
            }
        }
    }

    fn dispose(&self, node: GraphNode) {
        match self.garbage_tx.try_send(node) {
            Ok(()) => (),
            Err(TrySendError::Full(_)) => {
                log::warn!("Garbage queue is full, dropping a root on the audio thread")
            }
            Err(TrySendError::Disconnected(_)) => (),
        }
    }
}

impl AudioProcess for Io {
    fn process(&mut self, output_buffer: &mut dyn AudioBuffer) {
        self.process_commands();
        self.sequence += 1;

        let root = match &self.root {
            Some(root) => root,
            None => {
                output_buffer.clear();
                return;
            }
        };

        let mut context = ProcessContext::new(output_buffer, self.sequence);
        if let Err(error) = root.next_buffer(&mut context) {
            log::error!("Error pulling block {}: {error}", self.sequence);
            output_buffer.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        create_engine, AudioBuffer, AudioProcess, Constant, EngineOptions, Node, OwnedAudioBuffer,
        SampleLocation,
    };

    #[test]
    fn outputs_silence_without_a_root() {
        let (_context, mut io) = create_engine(EngineOptions::default());
        let mut output = OwnedAudioBuffer::new(16, 2, 44_100);
        output.fill_with_value(1.0);

        io.process(&mut output);

        assert!(output.channel_is_silent(0));
        assert!(output.channel_is_silent(1));
        assert_eq!(io.sequence(), 1);
    }

    #[test]
    fn replaced_roots_are_handed_back() {
        let (context, mut io) = create_engine(EngineOptions::default());
        let first = Node::new(&context, Constant::new(1.0));
        let second = Node::new(&context, Constant::new(2.0));

        context.set_root(&first);
        context.set_root(&second);

        let mut output = OwnedAudioBuffer::new(4, 1, 44_100);
        io.process(&mut output);

        assert_eq!(output.get_sample(SampleLocation::origin()), 2.0);
        assert_eq!(first.generator().output_count(), 0);
        assert_eq!(second.generator().output_count(), 1);
        assert_eq!(context.collect_garbage(), 1);
    }

    #[test]
    fn interleaved_pull_spans_several_blocks() {
        let options = EngineOptions::default().with_max_buffer_frames(4);
        let (context, mut io) = create_engine(options);
        context.set_root(&Node::new(&context, Constant::new(0.5)));

        let mut data = vec![0.0; 10 * 2];
        io.process_interleaved(&mut data, 2);

        assert!(data.iter().all(|sample| *sample == 0.5));
        assert_eq!(io.sequence(), 3);
    }
}
