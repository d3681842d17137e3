use crate::{
    AudioBuffer, GraphError, GraphResult, OwnedAudioBuffer, SampleLocation, SoundFileInfo,
    SoundFileReader, SoundFileWriter,
};

/// A sound file held in memory, one vector per channel
#[derive(Debug, Clone, Default)]
pub struct MemorySoundFile {
    channels: Vec<Vec<f32>>,
    frame_rate: usize,
    position: usize,
    finalized: bool,
}

impl MemorySoundFile {
    /// An empty file, ready to be written
    pub fn new(channel_count: usize, frame_rate: usize) -> Self {
        Self {
            channels: vec![Vec::new(); channel_count],
            frame_rate,
            position: 0,
            finalized: false,
        }
    }

    pub fn from_channels(channels: Vec<Vec<f32>>, frame_rate: usize) -> Self {
        Self {
            channels,
            frame_rate,
            position: 0,
            finalized: false,
        }
    }

    pub fn from_buffer(buffer: &dyn AudioBuffer) -> Self {
        let channels = (0..buffer.channel_count())
            .map(|channel| {
                buffer
                    .get_channel_data(SampleLocation::channel(channel))
                    .to_vec()
            })
            .collect();

        Self::from_channels(channels, buffer.sample_rate())
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn to_buffer(&self) -> OwnedAudioBuffer {
        OwnedAudioBuffer::from_channels(&self.channels, self.frame_rate)
    }

    fn frame_count(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.len())
            .min()
            .unwrap_or(0)
    }
}

impl SoundFileReader for MemorySoundFile {
    fn info(&self) -> SoundFileInfo {
        SoundFileInfo {
            channel_count: self.channels.len(),
            frame_rate: self.frame_rate,
            frame_count: self.frame_count(),
        }
    }

    fn seek(&mut self, frame: usize) -> GraphResult<()> {
        if frame > self.frame_count() {
            return Err(GraphError::OutOfRange(format!(
                "seeking to frame {frame} of a {} frame file",
                self.frame_count()
            )));
        }

        self.position = frame;
        Ok(())
    }

    fn read_frames(
        &mut self,
        destination: &mut dyn AudioBuffer,
        frame_count: usize,
    ) -> GraphResult<usize> {
        let frame_count = frame_count
            .min(self.frame_count().saturating_sub(self.position))
            .min(destination.frame_count());

        let channel_count = self.channels.len().min(destination.channel_count());
        let range = self.position..self.position + frame_count;

        for (index, channel) in self.channels.iter().take(channel_count).enumerate() {
            let output = destination.get_channel_data_mut(SampleLocation::channel(index));
            output[..frame_count].copy_from_slice(&channel[range.clone()]);
        }

        self.position += frame_count;
        Ok(frame_count)
    }
}

impl SoundFileWriter for MemorySoundFile {
    fn write_frames(&mut self, source: &dyn AudioBuffer) -> GraphResult<()> {
        if self.finalized {
            return Err(GraphError::Logic(
                "writing to a finalized sound file".to_string(),
            ));
        }

        if source.channel_count() != self.channels.len() {
            return Err(GraphError::Value(format!(
                "writing {} channels to a {} channel file",
                source.channel_count(),
                self.channels.len()
            )));
        }

        for (index, channel) in self.channels.iter_mut().enumerate() {
            channel.extend_from_slice(source.get_channel_data(SampleLocation::channel(index)));
        }

        Ok(())
    }

    fn finalize(&mut self) -> GraphResult<()> {
        self.finalized = true;
        Ok(())
    }
}
