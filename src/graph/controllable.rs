use crate::{ControlInputs, ControlKey, PortInput};

/// A node with a map of named inputs
pub trait Controllable {
    fn controls(&self) -> &ControlInputs;

    fn controls_mut(&mut self) -> &mut ControlInputs;

    /// Assign a fixed value or a generator to one of the node's inputs
    fn add_input(&mut self, key: ControlKey, input: impl Into<PortInput>)
    where
        Self: Sized,
    {
        self.controls_mut().set(key, input);
    }
}

/// A node whose output is multiplied by `scale` and shifted by `offset`
pub trait Scalable: Controllable {
    fn set_scale(&mut self, scale: impl Into<PortInput>)
    where
        Self: Sized,
    {
        self.controls_mut().set(ControlKey::Scale, scale);
    }

    fn set_offset(&mut self, offset: impl Into<PortInput>)
    where
        Self: Sized,
    {
        self.controls_mut().set(ControlKey::Offset, offset);
    }

    /// Whether scale and offset are fixed at 1 and 0
    fn is_unscaled(&self) -> bool {
        let controls = self.controls();
        controls.is_fixed(ControlKey::Scale)
            && controls.is_fixed(ControlKey::Offset)
            && controls.value(ControlKey::Scale) == 1.0
            && controls.value(ControlKey::Offset) == 0.0
    }
}

/// A node driven by a frequency with a running phase
pub trait Phased: Controllable {
    fn set_frequency(&mut self, frequency: impl Into<PortInput>)
    where
        Self: Sized,
    {
        self.controls_mut().set(ControlKey::Frequency, frequency);
    }

    /// The current phase, in cycles from 0 to 1
    fn phase(&self) -> f32;

    fn set_phase(&mut self, phase: f32);
}

/// A node with a single audio input
pub trait Effect: Controllable {
    fn set_input(&mut self, input: impl Into<PortInput>)
    where
        Self: Sized,
    {
        self.controls_mut().set(ControlKey::Input, input);
    }
}

/// A phase accumulator in cycles
#[derive(Debug, Clone, Copy, Default)]
pub struct Phase {
    value: f32,
}

impl Phase {
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set(&mut self, phase: f32) {
        self.value = phase.rem_euclid(1.0);
    }

    /// Move forward by `frequency / sample_rate` cycles, returning the phase before the move
    pub fn advance(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let current = self.value;
        self.value = (self.value + frequency / sample_rate).rem_euclid(1.0);
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn phase_wraps_into_one_cycle() {
        let mut phase = Phase::default();
        phase.set(1.25);
        assert_relative_eq!(phase.value(), 0.25);

        phase.set(-0.25);
        assert_relative_eq!(phase.value(), 0.75);
    }

    #[test]
    fn phase_advances_by_frequency_over_rate() {
        let mut phase = Phase::default();
        assert_relative_eq!(phase.advance(1.0, 4.0), 0.0);
        assert_relative_eq!(phase.advance(1.0, 4.0), 0.25);
        assert_relative_eq!(phase.value(), 0.5);
    }
}
