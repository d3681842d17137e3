use crate::{
    AudioBuffer, Context, ControlInputs, ControlKey, Controllable, DspProcessor, Effect,
    GraphResult, PortInput, ProcessContext, SampleLocation, Scalable,
};

use super::filter_coefficients::{ButterworthType, FilterCoefficients, MAX_COEFFICIENTS};

/// How a filter turns its frequency and amount into coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterDesign {
    /// Amount is the bandwidth in Hz (band pass and band stop only)
    Butterworth(ButterworthType),

    /// Amount is the pole radius
    Formant { normalize: bool },

    /// Amount is the zero radius
    Notch,

    /// Frequency is used as the allpass coefficient
    Allpass,

    /// Fixed coefficients, ignoring frequency and amount
    Custom,
}

impl FilterDesign {
    fn coefficients(
        &self,
        frequency: f64,
        amount: f64,
        sample_rate: f64,
    ) -> Option<FilterCoefficients> {
        match *self {
            FilterDesign::Butterworth(filter_type) => Some(FilterCoefficients::butterworth(
                filter_type,
                frequency,
                amount,
                sample_rate,
            )),
            FilterDesign::Formant { normalize } => Some(FilterCoefficients::formant(
                frequency,
                amount,
                sample_rate,
                normalize,
            )),
            FilterDesign::Notch => Some(FilterCoefficients::notch(frequency, amount, sample_rate)),
            FilterDesign::Allpass => Some(FilterCoefficients::allpass(frequency)),
            FilterDesign::Custom => None,
        }
    }
}

#[derive(Clone, Copy, Default)]
struct FilterHistory {
    inputs: [f64; MAX_COEFFICIENTS],
    outputs: [f64; MAX_COEFFICIENTS],
}

impl FilterHistory {
    fn process(&mut self, coefficients: &FilterCoefficients, input: f64) -> f64 {
        self.inputs.copy_within(0..MAX_COEFFICIENTS - 1, 1);
        self.inputs[0] = input;

        let feed_forward: f64 = coefficients
            .b()
            .iter()
            .zip(self.inputs.iter())
            .map(|(b, x)| b * x)
            .sum();

        let feedback: f64 = coefficients
            .a()
            .iter()
            .skip(1)
            .zip(self.outputs.iter())
            .map(|(a, y)| a * y)
            .sum();

        let output = feed_forward - feedback;

        self.outputs.copy_within(0..MAX_COEFFICIENTS - 1, 1);
        self.outputs[0] = output;

        output
    }
}

/// A direct-form difference equation filter
///
/// Every input channel is filtered with its own history. When the frequency or
/// amount is driven by a generator, the coefficients are recomputed on every sample;
/// fixed values recompute them only when they are set.
pub struct Filter {
    controls: ControlInputs,
    design: FilterDesign,
    coefficients: FilterCoefficients,
    history: Vec<FilterHistory>,
    sample_rate: f64,
    coefficient_updates: u64,
}

impl Filter {
    fn with_design(
        context: &Context,
        design: FilterDesign,
        frequency: impl Into<PortInput>,
        amount: impl Into<PortInput>,
    ) -> Self {
        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Frequency, frequency);
        controls.set(ControlKey::Amount, amount);
        controls.set(ControlKey::Scale, 1.0);
        controls.set(ControlKey::Offset, 0.0);

        let mut filter = Self {
            controls,
            design,
            coefficients: FilterCoefficients::pass_through(),
            history: vec![FilterHistory::default(); context.options().output_channel_count.max(1)],
            sample_rate: context.sample_rate() as f64,
            coefficient_updates: 0,
        };

        filter.update_fixed_coefficients();
        filter
    }

    /// A Butterworth filter with its bandwidth set to a tenth of `frequency`
    pub fn butterworth(
        context: &Context,
        filter_type: ButterworthType,
        frequency: impl Into<PortInput>,
    ) -> Self {
        let frequency = frequency.into();
        let bandwidth = match &frequency {
            PortInput::Value(value) => *value / 10.0,
            PortInput::Generator(_) => 100.0,
        };

        Self::with_design(
            context,
            FilterDesign::Butterworth(filter_type),
            frequency,
            bandwidth,
        )
    }

    /// A Butterworth band filter with an explicit bandwidth in Hz
    pub fn butterworth_band(
        context: &Context,
        filter_type: ButterworthType,
        center: impl Into<PortInput>,
        bandwidth: impl Into<PortInput>,
    ) -> Self {
        Self::with_design(
            context,
            FilterDesign::Butterworth(filter_type),
            center,
            bandwidth,
        )
    }

    /// A normalized resonator
    pub fn formant(context: &Context, frequency: impl Into<PortInput>, radius: f32) -> Self {
        Self::with_design(
            context,
            FilterDesign::Formant { normalize: true },
            frequency,
            radius,
        )
    }

    pub fn notch(context: &Context, frequency: impl Into<PortInput>, radius: f32) -> Self {
        Self::with_design(context, FilterDesign::Notch, frequency, radius)
    }

    pub fn allpass(context: &Context, coefficient: impl Into<PortInput>) -> Self {
        Self::with_design(context, FilterDesign::Allpass, coefficient, 1.0)
    }

    /// A filter with explicit `b` and `a` coefficients
    pub fn with_coefficients(context: &Context, b: &[f64], a: &[f64]) -> GraphResult<Self> {
        let mut filter = Self::with_design(context, FilterDesign::Custom, 0.0, 0.0);
        filter.set_coefficients(b, a)?;
        Ok(filter)
    }

    /// Replace the coefficients, switching the filter to a custom design
    pub fn set_coefficients(&mut self, b: &[f64], a: &[f64]) -> GraphResult<()> {
        self.coefficients = FilterCoefficients::new(b, a)?;
        self.design = FilterDesign::Custom;
        self.coefficient_updates += 1;
        Ok(())
    }

    pub fn design(&self) -> FilterDesign {
        self.design
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    /// Toggle the peak normalization of a formant filter
    pub fn set_normalize(&mut self, normalize: bool) {
        if let FilterDesign::Formant { .. } = self.design {
            self.design = FilterDesign::Formant { normalize };
            self.update_fixed_coefficients();
        }
    }

    /// Set the frequency, or the coefficient of an allpass
    pub fn set_frequency(&mut self, frequency: impl Into<PortInput>) {
        self.controls.set(ControlKey::Frequency, frequency);
        self.update_fixed_coefficients();
    }

    /// Set the bandwidth or radius, depending on the design
    pub fn set_amount(&mut self, amount: impl Into<PortInput>) {
        self.controls.set(ControlKey::Amount, amount);
        self.update_fixed_coefficients();
    }

    /// Zero the input and output history
    pub fn clear(&mut self) {
        self.history.fill(FilterHistory::default());
    }

    /// How many channels have their own history
    pub fn history_channels(&self) -> usize {
        self.history.len()
    }

    fn reserve_history(&mut self) {
        let channel_count = self.controls.input_channel_count();
        if self.history.len() < channel_count {
            self.history.resize(channel_count, FilterHistory::default());
        }
    }

    /// How many times the coefficients have been computed
    pub fn coefficient_updates(&self) -> u64 {
        self.coefficient_updates
    }

    fn is_dynamic(&self) -> bool {
        self.design != FilterDesign::Custom
            && !(self.controls.is_fixed(ControlKey::Frequency)
                && self.controls.is_fixed(ControlKey::Amount))
    }

    fn update_fixed_coefficients(&mut self) {
        if self.is_dynamic() {
            return;
        }

        let frequency = self.controls.value(ControlKey::Frequency);
        let amount = self.controls.value(ControlKey::Amount);
        self.update_coefficients(frequency, amount);
    }

    fn update_coefficients(&mut self, frequency: f32, amount: f32) {
        if let Some(coefficients) =
            self.design
                .coefficients(frequency as f64, amount as f64, self.sample_rate)
        {
            self.coefficients = coefficients;
            self.coefficient_updates += 1;
        }
    }
}

impl Controllable for Filter {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Scalable for Filter {}

impl Effect for Filter {
    fn set_input(&mut self, input: impl Into<PortInput>) {
        self.controls.set(ControlKey::Input, input);
        self.reserve_history();
    }
}

impl DspProcessor for Filter {
    fn channel_count(&self) -> usize {
        self.controls.input_channel_count().max(1)
    }

    fn is_active(&self) -> bool {
        self.controls.input_is_active()
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let frame_count = context.frame_count();
        let channel_count = context.channel_count();

        self.controls.check_input()?;
        self.controls.pull_all(frame_count, context.sequence)?;

        let filtered_channels = channel_count.min(self.history.len());
        let dynamic = self.is_dynamic();

        for frame in 0..frame_count {
            if dynamic {
                let frequency = self.controls.next_value(ControlKey::Frequency);
                let amount = self.controls.next_value(ControlKey::Amount);
                self.update_coefficients(frequency, amount);
            }

            let scale = self.controls.next_value(ControlKey::Scale) as f64;
            let offset = self.controls.next_value(ControlKey::Offset) as f64;

            for channel in 0..filtered_channels {
                let input = self.controls.input_sample(channel, frame) as f64;
                let output = self.history[channel].process(&self.coefficients, input);

                context.output_buffer.set_sample(
                    SampleLocation::new(channel, frame),
                    (output * scale + offset) as f32,
                );
            }
        }

        for channel in filtered_channels..channel_count {
            context.output_buffer.duplicate_channel(
                SampleLocation::channel(filtered_channels - 1),
                channel,
                frame_count,
            );
        }

        Ok(())
    }
}
