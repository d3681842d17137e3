use std::{str::FromStr, sync::Arc};

use crate::{
    AudioBuffer, DspProcessor, GraphError, GraphResult, OwnedAudioBuffer, ProcessContext,
    SampleLocation,
};

/// A named region of cached samples, played once per trigger
///
/// Cues are usually read from an index with one `name start stop` line per cue, where
/// `start` and `stop` are frame positions. A parsed cue has no samples until they are
/// attached with [SoundCue::with_samples], and stays inactive until then.
#[derive(Debug, Clone)]
pub struct SoundCue {
    name: String,
    samples: Option<Arc<OwnedAudioBuffer>>,
    start: usize,
    stop: usize,
    current: usize,
}

impl SoundCue {
    pub fn new(
        name: impl Into<String>,
        samples: Arc<OwnedAudioBuffer>,
        start: usize,
        stop: usize,
    ) -> Self {
        let stop = stop.min(samples.frame_count());
        Self {
            name: name.into(),
            samples: Some(samples),
            start: start.min(stop),
            stop,
            current: start.min(stop),
        }
    }

    /// Parse every non-empty line of an index, skipping `#` comments
    pub fn parse_list(text: &str) -> GraphResult<Vec<Self>> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::parse)
            .collect()
    }

    /// Attach the samples the region refers to, clamping the region to them
    pub fn with_samples(mut self, samples: Arc<OwnedAudioBuffer>) -> Self {
        self.stop = self.stop.min(samples.frame_count());
        self.start = self.start.min(self.stop);
        self.current = self.current.clamp(self.start, self.stop);
        self.samples = Some(samples);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// The length of the region in frames
    pub fn duration(&self) -> usize {
        self.stop - self.start
    }

    pub fn trigger(&mut self) {
        self.current = self.start;
    }

    pub fn set_to_end(&mut self) {
        self.current = self.stop;
    }
}

impl FromStr for SoundCue {
    type Err = GraphError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || GraphError::Value(format!("malformed cue line: {line:?}"));

        let mut fields = line.split_whitespace();
        let name = fields.next().ok_or_else(malformed)?;
        let start: usize = fields
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or_else(malformed)?;
        let stop: usize = fields
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or_else(malformed)?;

        if fields.next().is_some() || stop < start {
            return Err(malformed());
        }

        Ok(Self {
            name: name.to_string(),
            samples: None,
            start,
            stop,
            current: start,
        })
    }
}

impl DspProcessor for SoundCue {
    fn channel_count(&self) -> usize {
        self.samples
            .as_ref()
            .map_or(1, |samples| samples.channel_count())
    }

    fn is_active(&self) -> bool {
        self.samples.is_some() && self.current < self.stop
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let samples = match &self.samples {
            Some(samples) if self.current < self.stop => samples,
            _ => {
                context.output_buffer.clear();
                return Ok(());
            }
        };

        let frame_count = context.frame_count().min(self.stop - self.current);
        let last_channel = samples.channel_count().saturating_sub(1);

        for channel in 0..context.channel_count() {
            context.output_buffer.copy_from(
                &**samples,
                SampleLocation::new(channel.min(last_channel), self.current),
                SampleLocation::channel(channel),
                1,
                frame_count,
            );

            context
                .output_buffer
                .get_channel_data_mut(SampleLocation::new(channel, frame_count))
                .fill(0.0);
        }

        self.current += frame_count;
        Ok(())
    }
}
