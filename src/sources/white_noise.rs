use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    Context, ControlInputs, ControlKey, Controllable, CopyPolicy, DspProcessor, GraphResult,
    Scalable,
};

/// Uniform noise in [-1, 1], independent on every channel
pub struct WhiteNoise {
    controls: ControlInputs,
    random_generator: StdRng,
}

impl WhiteNoise {
    pub fn new(context: &Context) -> Self {
        Self::with_seed(context, rand::random())
    }

    /// Noise from a fixed seed, producing the same sequence on every run
    pub fn with_seed(context: &Context, seed: u64) -> Self {
        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Scale, 1.0);
        controls.set(ControlKey::Offset, 0.0);

        Self {
            controls,
            random_generator: StdRng::seed_from_u64(seed),
        }
    }
}

impl Controllable for WhiteNoise {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Scalable for WhiteNoise {}

impl DspProcessor for WhiteNoise {
    fn copy_policy(&self) -> CopyPolicy {
        CopyPolicy::Expand
    }

    fn prepare_block(&mut self, frame_count: usize, sequence: u64) -> GraphResult<()> {
        self.controls.pull_all(frame_count, sequence)
    }

    fn process_channel(&mut self, output: &mut [f32], _channel: usize) -> GraphResult<()> {
        self.controls.reset(ControlKey::Scale);
        self.controls.reset(ControlKey::Offset);

        for sample in output.iter_mut() {
            let scale = self.controls.next_value(ControlKey::Scale);
            let offset = self.controls.next_value(ControlKey::Offset);

            let value: f32 = self.random_generator.random_range(-1.0..=1.0);
            *sample = value * scale + offset;
        }

        Ok(())
    }
}
