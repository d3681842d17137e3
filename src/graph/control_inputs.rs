use crate::{AudioBuffer, Context, GraphError, GraphResult, Port, PortInput};

/// The named inputs a node can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// The audio input of an effect
    Input,
    Frequency,
    /// Bandwidth, radius or resonance, depending on the node
    Amount,
    Scale,
    Offset,
    Position,
    PositionX,
    PositionY,
    Rate,
}

impl ControlKey {
    pub const COUNT: usize = 9;

    fn index(self) -> usize {
        self as usize
    }
}

/// The ports of a node, at most one per [ControlKey]
///
/// Assigning a key replaces the port that was there, disconnecting its generator.
pub struct ControlInputs {
    ports: [Option<Port>; ControlKey::COUNT],
    max_frame_count: usize,
    sample_rate: usize,
}

impl ControlInputs {
    pub fn new(context: &Context) -> Self {
        Self {
            ports: std::array::from_fn(|_| None),
            max_frame_count: context.options().max_buffer_frames,
            sample_rate: context.sample_rate(),
        }
    }

    /// Assign a value or a generator to a key
    ///
    /// Giving a fixed value to a key that already has a fixed port just updates it.
    pub fn set(&mut self, key: ControlKey, input: impl Into<PortInput>) {
        let input = input.into();
        let slot = &mut self.ports[key.index()];

        match (slot.as_mut(), input) {
            (Some(port), PortInput::Value(value)) if port.is_fixed() => port.set_value(value),
            (_, input) => {
                *slot = Some(Port::from_input(
                    input,
                    self.max_frame_count,
                    self.sample_rate,
                ))
            }
        }
    }

    /// Remove the port for a key
    pub fn remove(&mut self, key: ControlKey) {
        self.ports[key.index()] = None;
    }

    pub fn contains(&self, key: ControlKey) -> bool {
        self.ports[key.index()].is_some()
    }

    pub fn port(&self, key: ControlKey) -> Option<&Port> {
        self.ports[key.index()].as_ref()
    }

    pub fn port_mut(&mut self, key: ControlKey) -> Option<&mut Port> {
        self.ports[key.index()].as_mut()
    }

    /// A missing port counts as fixed
    pub fn is_fixed(&self, key: ControlKey) -> bool {
        self.port(key).is_none_or(|port| port.is_fixed())
    }

    /// Pull the block for one key
    pub fn pull(&mut self, key: ControlKey, frame_count: usize, sequence: u64) -> GraphResult<()> {
        match self.port_mut(key) {
            Some(port) => port.pull(frame_count, sequence),
            None => Ok(()),
        }
    }

    /// Pull the block for every assigned key
    pub fn pull_all(&mut self, frame_count: usize, sequence: u64) -> GraphResult<()> {
        for port in self.ports.iter_mut().flatten() {
            port.pull(frame_count, sequence)?;
        }
        Ok(())
    }

    /// Read and advance the port for a key, or zero if there is none
    pub fn next_value(&mut self, key: ControlKey) -> f32 {
        self.port_mut(key).map_or(0.0, |port| port.next_value())
    }

    /// The current value of a key, or zero if there is none
    pub fn value(&self, key: ControlKey) -> f32 {
        self.port(key).map_or(0.0, |port| port.value())
    }

    /// Rewind the cursor of one key
    pub fn reset(&mut self, key: ControlKey) {
        if let Some(port) = self.port_mut(key) {
            port.reset();
        }
    }

    /// A sample of the pulled input block
    pub fn input_sample(&self, channel: usize, frame: usize) -> f32 {
        self.port(ControlKey::Input)
            .map_or(0.0, |port| port.sample(channel, frame))
    }

    /// The channel count of the generator feeding the input
    pub fn input_channel_count(&self) -> usize {
        self.port(ControlKey::Input)
            .and_then(|port| port.buffer())
            .map_or(0, |buffer| buffer.channel_count())
    }

    /// Check that the input is driven by a generator
    pub fn check_input(&self) -> GraphResult<&Port> {
        let port = self.port(ControlKey::Input).ok_or_else(|| {
            GraphError::Logic("the input of an effect is not connected".to_string())
        })?;
        port.check_buffer()?;
        Ok(port)
    }

    /// Whether the input still has signal
    pub fn input_is_active(&self) -> bool {
        self.port(ControlKey::Input)
            .is_some_and(|port| port.is_active())
    }
}
