use crate::{DspProcessor, GraphResult};

/// A node that outputs the same value on every sample
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }
}

impl DspProcessor for Constant {
    fn process_channel(&mut self, output: &mut [f32], _channel: usize) -> GraphResult<()> {
        output.fill(self.value);
        Ok(())
    }
}
