use crate::{
    AudioBuffer, DspProcessor, GraphError, GraphNode, GraphResult, Node, OwnedAudioBuffer,
    ProcessContext, SampleLocation,
};

/// What a port is driven by
#[derive(Clone, Debug)]
pub enum PortInput {
    Value(f32),
    Generator(GraphNode),
}

impl From<f32> for PortInput {
    fn from(value: f32) -> Self {
        Self::Value(value)
    }
}

impl From<f64> for PortInput {
    fn from(value: f64) -> Self {
        Self::Value(value as f32)
    }
}

impl From<GraphNode> for PortInput {
    fn from(generator: GraphNode) -> Self {
        Self::Generator(generator)
    }
}

impl From<&GraphNode> for PortInput {
    fn from(generator: &GraphNode) -> Self {
        Self::Generator(generator.clone())
    }
}

impl<P: DspProcessor + 'static> From<&Node<P>> for PortInput {
    fn from(node: &Node<P>) -> Self {
        Self::Generator(node.generator())
    }
}

enum PortMode {
    Fixed(f32),
    Dynamic {
        generator: GraphNode,
        buffer: OwnedAudioBuffer,
    },
}

/// A single input of a node
///
/// A fixed port rereads the same value on every [Port::next_value]. A dynamic port
/// pulls a block from its generator once per block ([Port::pull]) and then walks through
/// it one sample per call. The cursor can be rewound with [Port::reset] to scan the same
/// block again.
pub struct Port {
    mode: PortMode,
    cursor: usize,
    last_value: f32,
}

impl Port {
    pub fn fixed(value: f32) -> Self {
        Self {
            mode: PortMode::Fixed(value),
            cursor: 0,
            last_value: value,
        }
    }

    /// Connect a generator, registering this port as one of its consumers
    pub fn dynamic(generator: GraphNode, max_frame_count: usize, sample_rate: usize) -> Self {
        let channel_count = generator.channel_count().max(1);
        generator.add_output();

        Self {
            mode: PortMode::Dynamic {
                generator,
                buffer: OwnedAudioBuffer::new(max_frame_count, channel_count, sample_rate),
            },
            cursor: 0,
            last_value: 0.0,
        }
    }

    pub fn from_input(input: PortInput, max_frame_count: usize, sample_rate: usize) -> Self {
        match input {
            PortInput::Value(value) => Self::fixed(value),
            PortInput::Generator(generator) => Self::dynamic(generator, max_frame_count, sample_rate),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.mode, PortMode::Fixed(_))
    }

    /// How far the cursor moves on each [Port::next_value]
    pub fn increment(&self) -> usize {
        match self.mode {
            PortMode::Fixed(_) => 0,
            PortMode::Dynamic { .. } => 1,
        }
    }

    /// The generator driving this port, if any
    pub fn generator(&self) -> Option<&GraphNode> {
        match &self.mode {
            PortMode::Fixed(_) => None,
            PortMode::Dynamic { generator, .. } => Some(generator),
        }
    }

    /// Whether the source of this port still has signal
    pub fn is_active(&self) -> bool {
        match &self.mode {
            PortMode::Fixed(_) => true,
            PortMode::Dynamic { generator, .. } => generator.is_active(),
        }
    }

    /// Set a fixed value, disconnecting any generator
    pub fn set_value(&mut self, value: f32) {
        let previous = std::mem::replace(&mut self.mode, PortMode::Fixed(value));
        if let PortMode::Dynamic { generator, .. } = previous {
            generator.remove_output();
        }

        self.cursor = 0;
        self.last_value = value;
    }

    /// The value the next call to [Port::next_value] would start from
    pub fn value(&self) -> f32 {
        match &self.mode {
            PortMode::Fixed(value) => *value,
            PortMode::Dynamic { buffer, .. } => {
                if buffer.is_populated() {
                    buffer
                        .get_channel_data(SampleLocation::origin())
                        .first()
                        .copied()
                        .unwrap_or(self.last_value)
                } else {
                    self.last_value
                }
            }
        }
    }

    /// Pull the next block from the generator, if there is one
    pub fn pull(&mut self, frame_count: usize, sequence: u64) -> GraphResult<()> {
        if let PortMode::Dynamic { generator, buffer } = &mut self.mode {
            let channel_count = buffer.channel_count();
            buffer.reshape(channel_count, frame_count)?;

            generator.next_buffer(&mut ProcessContext::new(buffer, sequence))?;

            buffer.set_populated(true);
            buffer.set_sequence(sequence);
        }

        self.reset();
        Ok(())
    }

    /// Rewind to the start of the current block without pulling again
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Read the value at the cursor and advance it
    ///
    /// Past the end of the block, and before the first pull, the last value is held.
    pub fn next_value(&mut self) -> f32 {
        match &self.mode {
            PortMode::Fixed(value) => *value,
            PortMode::Dynamic { buffer, .. } => {
                if buffer.is_populated() {
                    let data = buffer.get_channel_data(SampleLocation::origin());
                    if let Some(value) = data.get(self.cursor) {
                        self.last_value = *value;
                    }
                    self.cursor += 1;
                }

                self.last_value
            }
        }
    }

    /// A sample of the pulled block, repeating the last channel for wider reads
    pub fn sample(&self, channel: usize, frame: usize) -> f32 {
        match &self.mode {
            PortMode::Fixed(value) => *value,
            PortMode::Dynamic { buffer, .. } => {
                let channel = channel.min(buffer.channel_count().saturating_sub(1));
                buffer
                    .get_channel_data(SampleLocation::channel(channel))
                    .get(frame)
                    .copied()
                    .unwrap_or(0.0)
            }
        }
    }

    /// The block pulled from the generator
    pub fn buffer(&self) -> Option<&OwnedAudioBuffer> {
        match &self.mode {
            PortMode::Fixed(_) => None,
            PortMode::Dynamic { buffer, .. } => Some(buffer),
        }
    }

    /// The pulled block, or a logic error if the port isn't driven by a generator
    pub fn check_buffer(&self) -> GraphResult<&OwnedAudioBuffer> {
        self.buffer().ok_or_else(|| {
            GraphError::Logic("checking an unassigned buffer".to_string())
        })
    }
}

impl Drop for Port {
    fn drop(&mut self) {
        if let PortMode::Dynamic { generator, .. } = &self.mode {
            generator.remove_output();
        }
    }
}
