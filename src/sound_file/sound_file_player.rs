use std::{io::SeekFrom, sync::Arc};

use crate::{
    AudioBuffer, Context, ControlInputs, ControlKey, Controllable, DspProcessor, GraphError,
    GraphResult, OwnedAudioBuffer, PortInput, ProcessContext, SampleLocation, Scalable,
    SoundFileInfo, SoundFileReader, Timestamp,
};

/// Plays a region of a sound file, optionally looping or resampling
///
/// The player reads from a [SoundFileReader] block by block, or from samples cached in
/// memory once [SoundFilePlayer::cache_samples] has been called. The region between
/// `start` and `stop` is played once, after which the player goes silent and inactive;
/// a looping player jumps back to frame 0 as soon as it reaches `stop`, in the middle
/// of a block if need be.
///
/// The output has as many channels as the file. A wider request repeats the last
/// channel of the file.
pub struct SoundFilePlayer {
    controls: ControlInputs,
    reader: Option<Box<dyn SoundFileReader>>,
    info: SoundFileInfo,
    samples: Option<Arc<OwnedAudioBuffer>>,
    scratch: OwnedAudioBuffer,
    start: usize,
    stop: usize,
    current: usize,
    position: f64,
    looping: bool,
}

impl SoundFilePlayer {
    /// Stream from a reader without caching
    pub fn open(context: &Context, reader: impl SoundFileReader + 'static) -> GraphResult<Self> {
        let info = reader.info();
        let mut player = Self::with_info(context, info)?;
        player.reader = Some(Box::new(reader));
        Ok(player)
    }

    /// Play samples that are already in memory
    pub fn from_samples(context: &Context, samples: OwnedAudioBuffer) -> GraphResult<Self> {
        let info = SoundFileInfo {
            channel_count: samples.channel_count(),
            frame_rate: samples.sample_rate(),
            frame_count: samples.frame_count(),
        };

        let mut player = Self::with_info(context, info)?;
        player.samples = Some(Arc::new(samples));
        Ok(player)
    }

    /// Open a WAV file and cache its samples
    #[cfg(feature = "wav")]
    pub fn open_wav(context: &Context, path: impl AsRef<std::path::Path>) -> GraphResult<Self> {
        let mut player = Self::open(context, crate::WavReader::open(path)?)?;
        player.cache_samples()?;
        Ok(player)
    }

    fn with_info(context: &Context, info: SoundFileInfo) -> GraphResult<Self> {
        if info.channel_count == 0 {
            return Err(GraphError::Value(
                "a sound file needs at least one channel".to_string(),
            ));
        }

        let mut controls = ControlInputs::new(context);
        controls.set(ControlKey::Rate, 1.0);
        controls.set(ControlKey::Scale, 1.0);
        controls.set(ControlKey::Offset, 0.0);

        Ok(Self {
            controls,
            reader: None,
            info,
            samples: None,
            scratch: OwnedAudioBuffer::new(
                context.options().max_buffer_frames,
                info.channel_count,
                info.frame_rate,
            ),
            start: 0,
            stop: info.frame_count,
            current: 0,
            position: 0.0,
            looping: false,
        })
    }

    pub fn info(&self) -> SoundFileInfo {
        self.info
    }

    /// Whether there is anything to read from
    pub fn is_valid(&self) -> bool {
        self.reader.is_some() || self.samples.is_some()
    }

    /// Release the reader and the cached samples
    pub fn close(&mut self) {
        self.reader = None;
        self.samples = None;
    }

    pub fn is_cached(&self) -> bool {
        self.samples.is_some()
    }

    /// The cached samples, shared with whoever else plays them
    pub fn cached_samples(&self) -> Option<Arc<OwnedAudioBuffer>> {
        self.samples.clone()
    }

    /// Read the whole file into memory
    pub fn cache_samples(&mut self) -> GraphResult<()> {
        if self.samples.is_some() {
            return Ok(());
        }

        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| GraphError::Logic("caching a closed sound file".to_string()))?;

        let mut samples = OwnedAudioBuffer::unallocated(
            self.info.frame_count,
            self.info.channel_count,
            self.info.frame_rate,
        );
        samples.allocate()?;

        reader.seek(0)?;
        let read = reader.read_frames(&mut samples, self.info.frame_count)?;
        if read < self.info.frame_count {
            log::warn!(
                "Sound file ended after {read} of {} frames",
                self.info.frame_count
            );
        }

        self.samples = Some(Arc::new(samples));
        Ok(())
    }

    /// Average the channels of the cached samples into one
    pub fn merge_to_mono(&mut self) -> GraphResult<()> {
        self.cache_samples()?;

        if let Some(samples) = self.samples.as_mut() {
            Arc::make_mut(samples).merge_to_mono();
            self.info.channel_count = 1;
        }

        Ok(())
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    /// The frame the next block starts from
    pub fn current(&self) -> usize {
        self.current
    }

    /// Set the first frame of the region, clamped to the file
    pub fn set_start(&mut self, frame: usize) {
        self.start = frame.min(self.info.frame_count);
    }

    /// Set the frame the region ends before, clamped to the file
    pub fn set_stop(&mut self, frame: usize) {
        self.stop = frame.min(self.info.frame_count);
    }

    pub fn set_start_seconds(&mut self, seconds: f64) {
        self.set_start(self.seconds_to_frames(seconds));
    }

    pub fn set_stop_seconds(&mut self, seconds: f64) {
        self.set_stop(self.seconds_to_frames(seconds));
    }

    /// Set the start as a fraction of the file length
    pub fn set_start_ratio(&mut self, ratio: f64) {
        self.set_start(self.ratio_to_frames(ratio));
    }

    /// Set the stop as a fraction of the file length
    pub fn set_stop_ratio(&mut self, ratio: f64) {
        self.set_stop(self.ratio_to_frames(ratio));
    }

    /// The length of the region in frames
    pub fn duration(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    pub fn duration_in_seconds(&self) -> f64 {
        if self.info.frame_rate == 0 {
            return 0.0;
        }

        Timestamp::from_samples(self.duration() as f64, self.info.frame_rate).as_seconds()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Set the playback rate; anything but a fixed 1 caches the file
    pub fn set_rate(&mut self, rate: impl Into<PortInput>) -> GraphResult<()> {
        self.controls.set(ControlKey::Rate, rate);

        if !self.plays_at_native_rate() {
            self.cache_samples()?;
        }

        Ok(())
    }

    /// Move the cursor, returning the new position in frames
    pub fn seek_to(&mut self, position: SeekFrom) -> GraphResult<usize> {
        let frame_count = self.info.frame_count as i64;
        let target = match position {
            SeekFrom::Start(frame) => frame as i64,
            SeekFrom::Current(delta) => self.current as i64 + delta,
            SeekFrom::End(delta) => frame_count + delta,
        };

        if !(0..=frame_count).contains(&target) {
            log::warn!("Seek to frame {target} is outside a {frame_count} frame file");
            return Err(GraphError::OutOfRange(format!(
                "can't seek to frame {target} of a {frame_count} frame file"
            )));
        }

        self.move_to(target as usize);
        Ok(self.current)
    }

    /// Play the region again from its start
    pub fn trigger(&mut self) {
        self.move_to(self.start);
    }

    /// Finish playing straight away
    pub fn set_to_end(&mut self) {
        self.move_to(self.stop);
    }

    fn move_to(&mut self, frame: usize) {
        self.current = frame;
        self.position = frame as f64;
    }

    fn seconds_to_frames(&self, seconds: f64) -> usize {
        Timestamp::from_seconds(seconds.max(0.0)).as_frames(self.info.frame_rate)
    }

    fn ratio_to_frames(&self, ratio: f64) -> usize {
        (ratio.clamp(0.0, 1.0) * self.info.frame_count as f64).round() as usize
    }

    fn plays_at_native_rate(&self) -> bool {
        self.controls.is_fixed(ControlKey::Rate) && self.controls.value(ControlKey::Rate) == 1.0
    }

    /// Copy frames straight from the source, returning how many were written
    fn copy_frames(&mut self, output: &mut dyn AudioBuffer) -> GraphResult<usize> {
        let frame_count = output.frame_count();
        let mut written = 0;

        while written < frame_count && self.current < self.stop {
            let chunk = (frame_count - written).min(self.stop - self.current);
            self.copy_chunk(output, written, chunk)?;

            self.current += chunk;
            written += chunk;

            if self.looping && self.current >= self.stop {
                self.current = 0;
            }
        }

        self.position = self.current as f64;
        Ok(written)
    }

    fn copy_chunk(
        &mut self,
        output: &mut dyn AudioBuffer,
        offset: usize,
        frame_count: usize,
    ) -> GraphResult<()> {
        if self.samples.is_none() {
            let reader = self.reader.as_mut().ok_or_else(|| {
                GraphError::Logic("reading from a closed sound file".to_string())
            })?;

            self.scratch.reshape(self.info.channel_count, frame_count)?;
            reader.seek(self.current)?;

            let read = reader.read_frames(&mut self.scratch, frame_count)?;
            for channel in 0..self.info.channel_count {
                self.scratch
                    .get_channel_data_mut(SampleLocation::new(channel, read))
                    .fill(0.0);
            }
        }

        let (source, source_frame): (&dyn AudioBuffer, usize) = match &self.samples {
            Some(samples) => (&**samples, self.current),
            None => (&self.scratch, 0),
        };

        let last_channel = source.channel_count().saturating_sub(1);
        for channel in 0..output.channel_count() {
            output.copy_from(
                source,
                SampleLocation::new(channel.min(last_channel), source_frame),
                SampleLocation::new(channel, offset),
                1,
                frame_count,
            );
        }

        Ok(())
    }

    /// Read with linear interpolation at the rate input, returning how many frames were written
    fn resample_frames(&mut self, output: &mut dyn AudioBuffer) -> GraphResult<usize> {
        let Some(samples) = self.samples.clone() else {
            log::warn!("Resampling needs cached samples, playing at the native rate");
            return self.copy_frames(output);
        };

        let stop = self.stop as f64;
        let last_frame = self.stop.saturating_sub(1);
        let last_channel = samples.channel_count().saturating_sub(1);
        let mut written = 0;

        for frame in 0..output.frame_count() {
            if self.position >= stop {
                if self.looping && self.stop > 0 {
                    self.position = 0.0;
                } else {
                    break;
                }
            }

            let rate = self.controls.next_value(ControlKey::Rate).max(0.0);
            let index = self.position.floor() as usize;
            let next = (index + 1).min(last_frame);
            let fraction = (self.position - index as f64) as f32;

            for channel in 0..output.channel_count() {
                let data =
                    samples.get_channel_data(SampleLocation::channel(channel.min(last_channel)));
                let value = data[index] + (data[next] - data[index]) * fraction;
                output.set_sample(SampleLocation::new(channel, frame), value);
            }

            self.position += rate as f64;
            written = frame + 1;
        }

        self.current = (self.position.floor() as usize).min(self.stop);
        if self.looping && self.current >= self.stop {
            self.move_to(0);
        }

        Ok(written)
    }

    fn apply_scale_and_offset(&mut self, output: &mut dyn AudioBuffer, frame_count: usize) {
        for channel in 0..output.channel_count() {
            self.controls.reset(ControlKey::Scale);
            self.controls.reset(ControlKey::Offset);

            let data = output.get_channel_data_mut(SampleLocation::channel(channel));
            for sample in data[..frame_count].iter_mut() {
                let scale = self.controls.next_value(ControlKey::Scale);
                let offset = self.controls.next_value(ControlKey::Offset);
                *sample = *sample * scale + offset;
            }
        }
    }
}

impl Controllable for SoundFilePlayer {
    fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut ControlInputs {
        &mut self.controls
    }
}

impl Scalable for SoundFilePlayer {}

impl DspProcessor for SoundFilePlayer {
    fn channel_count(&self) -> usize {
        self.info.channel_count
    }

    fn is_active(&self) -> bool {
        self.is_valid() && self.current < self.stop
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let frame_count = context.frame_count();
        self.controls.pull_all(frame_count, context.sequence)?;

        if !self.is_active() {
            context.output_buffer.clear();
            return Ok(());
        }

        let written = if self.plays_at_native_rate() {
            self.copy_frames(context.output_buffer)?
        } else {
            self.resample_frames(context.output_buffer)?
        };

        if !self.is_unscaled() {
            self.apply_scale_and_offset(context.output_buffer, written);
        }

        for channel in 0..context.channel_count() {
            context
                .output_buffer
                .get_channel_data_mut(SampleLocation::new(channel, written))
                .fill(0.0);
        }

        Ok(())
    }
}
