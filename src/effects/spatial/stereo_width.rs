use approx::abs_diff_eq;

use crate::{
    AudioBuffer, Context, ControlInputs, ControlKey, Controllable, DspProcessor, Effect,
    GraphResult, Level, PortInput, ProcessContext, SampleLocation,
};

const NO_OP_TOLERANCE: f32 = 1e-4;

/// Stereo widening with an equal power pan and an output gain
///
/// Each channel has a `width` share of the other added to it, then the pair is
/// panned and scaled. At zero width, centre pan and unity gain the input passes
/// through untouched.
pub struct StereoWidth {
    controls: ControlInputs,
    width: f32,
    pan: f32,
    gain: Level,
}

impl StereoWidth {
    pub fn new(context: &Context, input: impl Into<PortInput>) -> Self {
        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Input, input);

        Self {
            controls,
            width: 0.0,
            pan: 0.5,
            gain: Level::unity(),
        }
    }

    /// The share of each channel mixed into the other, from -1 to 1
    pub fn set_width(&mut self, width: f32) {
        self.width = width.clamp(-1.0, 1.0);
    }

    /// Pan from 0 (left) to 1 (right)
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(0.0, 1.0);
    }

    pub fn set_gain(&mut self, gain: Level) {
        self.gain = gain;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn gain(&self) -> Level {
        self.gain
    }

    fn is_no_op(&self) -> bool {
        abs_diff_eq!(self.width, 0.0, epsilon = NO_OP_TOLERANCE)
            && abs_diff_eq!(self.pan, 0.5, epsilon = NO_OP_TOLERANCE)
            && abs_diff_eq!(self.gain.linear(), 1.0, epsilon = NO_OP_TOLERANCE)
    }
}

impl Controllable for StereoWidth {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Effect for StereoWidth {}

impl DspProcessor for StereoWidth {
    fn channel_count(&self) -> usize {
        2
    }

    fn is_active(&self) -> bool {
        self.controls.input_is_active()
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        if context.channel_count() != 2 {
            log::error!(
                "Stereo width asked for {} channels, it only produces 2",
                context.channel_count()
            );
            context.output_buffer.clear();
            return Ok(());
        }

        let frame_count = context.frame_count();

        self.controls.check_input()?;
        self.controls
            .pull(ControlKey::Input, frame_count, context.sequence)?;

        let is_no_op = self.is_no_op();

        let gain = self.gain.linear();
        let l_gain = (2.0 * (1.0 - self.pan)).sqrt() * gain;
        let r_gain = (2.0 * self.pan).sqrt() * gain;

        for frame in 0..frame_count {
            let l_input = self.controls.input_sample(0, frame);
            let r_input = self.controls.input_sample(1, frame);

            let (l_value, r_value) = if is_no_op {
                (l_input, r_input)
            } else {
                (
                    (l_input + r_input * self.width) * l_gain,
                    (r_input + l_input * self.width) * r_gain,
                )
            };

            context
                .output_buffer
                .set_sample(SampleLocation::new(0, frame), l_value);
            context
                .output_buffer
                .set_sample(SampleLocation::new(1, frame), r_value);
        }

        Ok(())
    }
}
