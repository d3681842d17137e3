use std::f32::consts::FRAC_PI_2;

use crate::{
    AudioBuffer, Context, ControlInputs, ControlKey, Controllable, DspProcessor, Effect,
    GraphResult, PortInput, ProcessContext, SampleLocation, Scalable,
};

use super::SpeakerLayout;

/// Places a mono or stereo input on an arbitrary speaker layout
///
/// The source position comes from the X and Y inputs, read once per block. A stereo
/// input is split into two virtual sources: the left one at the position, the right
/// one rotated from it by the spread angle around the listener. Every speaker gets an
/// inverse distance gain from each virtual source.
pub struct NtoMPanner {
    controls: ControlInputs,
    layout: SpeakerLayout,
    spread: f32,
    left_gains: Vec<f32>,
    right_gains: Vec<f32>,
}

impl NtoMPanner {
    pub fn new(context: &Context, input: impl Into<PortInput>, layout: SpeakerLayout) -> Self {
        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Input, input);
        controls.set(ControlKey::PositionX, 0.0);
        controls.set(ControlKey::PositionY, 0.0);
        controls.set(ControlKey::Scale, 1.0);

        let speaker_count = layout.speaker_count();

        Self {
            controls,
            layout,
            spread: FRAC_PI_2,
            left_gains: vec![0.0; speaker_count],
            right_gains: vec![0.0; speaker_count],
        }
    }

    /// A panner using the preset layout for `channel_count` speakers
    pub fn for_channel_count(
        context: &Context,
        input: impl Into<PortInput>,
        channel_count: usize,
    ) -> GraphResult<Self> {
        Ok(Self::new(
            context,
            input,
            SpeakerLayout::for_channel_count(channel_count)?,
        ))
    }

    pub fn set_position(&mut self, x: impl Into<PortInput>, y: impl Into<PortInput>) {
        self.controls.set(ControlKey::PositionX, x);
        self.controls.set(ControlKey::PositionY, y);
    }

    /// Set the angle in radians between the left and right virtual sources
    pub fn set_spread(&mut self, spread: f32) {
        self.spread = spread;
    }

    pub fn spread(&self) -> f32 {
        self.spread
    }

    pub fn layout(&self) -> &SpeakerLayout {
        &self.layout
    }

    /// The current gains of the left and right virtual sources
    pub fn gains(&self) -> (&[f32], &[f32]) {
        (&self.left_gains, &self.right_gains)
    }

    fn update_gains(&mut self) {
        let left = (
            self.controls.value(ControlKey::PositionX),
            self.controls.value(ControlKey::PositionY),
        );

        let (sin, cos) = self.spread.sin_cos();
        let right = (left.0 * cos - left.1 * sin, left.0 * sin + left.1 * cos);

        self.layout
            .inverse_distance_gains(left, &mut self.left_gains);
        self.layout
            .inverse_distance_gains(right, &mut self.right_gains);
    }
}

impl Controllable for NtoMPanner {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Scalable for NtoMPanner {}

impl Effect for NtoMPanner {}

impl DspProcessor for NtoMPanner {
    fn channel_count(&self) -> usize {
        self.layout.speaker_count()
    }

    fn is_active(&self) -> bool {
        self.controls.input_is_active()
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let speaker_count = self.layout.speaker_count();

        if context.channel_count() != speaker_count {
            log::error!(
                "Panner asked for {} channels, its layout has {speaker_count} speakers",
                context.channel_count()
            );
            context.output_buffer.clear();
            return Ok(());
        }

        let frame_count = context.frame_count();

        self.controls.check_input()?;
        self.controls.pull_all(frame_count, context.sequence)?;
        self.update_gains();

        let is_stereo = self.controls.input_channel_count() > 1;

        for frame in 0..frame_count {
            let scale = self.controls.next_value(ControlKey::Scale);
            let left = self.controls.input_sample(0, frame) * scale;
            let right = if is_stereo {
                self.controls.input_sample(1, frame) * scale
            } else {
                0.0
            };

            for speaker in 0..speaker_count {
                let value = left * self.left_gains[speaker] + right * self.right_gains[speaker];
                context
                    .output_buffer
                    .set_sample(SampleLocation::new(speaker, frame), value);
            }
        }

        Ok(())
    }
}
