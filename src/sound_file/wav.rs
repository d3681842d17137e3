use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::{
    AudioBuffer, GraphError, GraphResult, SampleLocation, SoundFileInfo, SoundFileReader,
    SoundFileWriter,
};

impl From<hound::Error> for GraphError {
    fn from(error: hound::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// A streaming WAV file reader
///
/// Integer files are scaled into the range [-1, 1).
pub struct WavReader {
    reader: hound::WavReader<BufReader<File>>,
    info: SoundFileInfo,
    position: usize,
}

impl WavReader {
    pub fn open(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let reader = hound::WavReader::open(path)
            .map_err(|error| GraphError::Io(format!("{}: {error}", path.display())))?;

        let spec = reader.spec();
        let info = SoundFileInfo {
            channel_count: spec.channels as usize,
            frame_rate: spec.sample_rate as usize,
            frame_count: reader.duration() as usize,
        };

        log::debug!(
            "Opened {}: {} channels, {} frames at {} Hz",
            path.display(),
            info.channel_count,
            info.frame_count,
            info.frame_rate
        );

        Ok(Self {
            reader,
            info,
            position: 0,
        })
    }

    fn read_samples<S: hound::Sample>(
        &mut self,
        destination: &mut dyn AudioBuffer,
        frame_count: usize,
        convert: impl Fn(S) -> f32,
    ) -> GraphResult<()> {
        let channel_count = self.info.channel_count;
        let destination_channels = destination.channel_count();
        let mut samples = self.reader.samples::<S>();

        for frame in 0..frame_count {
            for channel in 0..channel_count {
                let sample = samples.next().ok_or_else(|| {
                    GraphError::Io("unexpected end of the WAV data".to_string())
                })??;

                if channel < destination_channels {
                    destination.set_sample(SampleLocation::new(channel, frame), convert(sample));
                }
            }
        }

        Ok(())
    }
}

impl SoundFileReader for WavReader {
    fn info(&self) -> SoundFileInfo {
        self.info
    }

    fn seek(&mut self, frame: usize) -> GraphResult<()> {
        if frame > self.info.frame_count {
            return Err(GraphError::OutOfRange(format!(
                "seeking to frame {frame} of a {} frame file",
                self.info.frame_count
            )));
        }

        if frame != self.position {
            self.reader.seek(frame as u32)?;
            self.position = frame;
        }

        Ok(())
    }

    fn read_frames(
        &mut self,
        destination: &mut dyn AudioBuffer,
        frame_count: usize,
    ) -> GraphResult<usize> {
        let frame_count = frame_count
            .min(destination.frame_count())
            .min(self.info.frame_count.saturating_sub(self.position));

        let spec = self.reader.spec();
        match spec.sample_format {
            hound::SampleFormat::Float => {
                self.read_samples::<f32>(destination, frame_count, |sample| sample)?
            }
            hound::SampleFormat::Int => {
                let full_scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                self.read_samples::<i32>(destination, frame_count, |sample| {
                    sample as f32 / full_scale
                })?
            }
        }

        self.position += frame_count;
        Ok(frame_count)
    }
}

/// A 32-bit float WAV file writer
pub struct WavWriter {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    channel_count: usize,
}

impl WavWriter {
    pub fn create(
        path: impl AsRef<Path>,
        channel_count: usize,
        frame_rate: usize,
    ) -> GraphResult<Self> {
        let spec = hound::WavSpec {
            channels: channel_count as u16,
            sample_rate: frame_rate as u32,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let writer = hound::WavWriter::create(path, spec)?;

        Ok(Self {
            writer: Some(writer),
            channel_count,
        })
    }
}

impl SoundFileWriter for WavWriter {
    fn write_frames(&mut self, source: &dyn AudioBuffer) -> GraphResult<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            GraphError::Logic("writing to a finalized sound file".to_string())
        })?;

        if source.channel_count() != self.channel_count {
            return Err(GraphError::Value(format!(
                "writing {} channels to a {} channel file",
                source.channel_count(),
                self.channel_count
            )));
        }

        for frame in 0..source.frame_count() {
            for channel in 0..self.channel_count {
                writer.write_sample(source.get_sample(SampleLocation::new(channel, frame)))?;
            }
        }

        Ok(())
    }

    fn finalize(&mut self) -> GraphResult<()> {
        match self.writer.take() {
            Some(writer) => Ok(writer.finalize()?),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OwnedAudioBuffer;
    use approx::assert_relative_eq;

    #[test]
    fn writes_and_reads_back_a_stereo_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("stereo.wav");

        let source =
            OwnedAudioBuffer::from_channels(&[vec![0.1, 0.2, 0.3], vec![-0.1, -0.2, -0.3]], 8_000);

        let mut writer = WavWriter::create(&path, 2, 8_000).unwrap();
        writer.write_frames(&source).unwrap();
        writer.finalize().unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        assert_eq!(
            reader.info(),
            SoundFileInfo {
                channel_count: 2,
                frame_rate: 8_000,
                frame_count: 3,
            }
        );

        let mut destination = OwnedAudioBuffer::new(3, 2, 8_000);
        reader.seek(1).unwrap();
        assert_eq!(reader.read_frames(&mut destination, 3).unwrap(), 2);

        assert_relative_eq!(destination.get_sample(SampleLocation::new(0, 0)), 0.2);
        assert_relative_eq!(destination.get_sample(SampleLocation::new(1, 1)), -0.3);
    }

    #[test]
    fn opening_a_missing_file_is_an_io_error() {
        let directory = tempfile::tempdir().unwrap();
        let result = WavReader::open(directory.path().join("missing.wav"));
        assert!(matches!(result, Err(GraphError::Io(_))));
    }

    #[test]
    fn writing_after_finalize_is_a_logic_error() {
        let directory = tempfile::tempdir().unwrap();
        let mut writer = WavWriter::create(directory.path().join("out.wav"), 1, 8_000).unwrap();
        writer.finalize().unwrap();

        let source = OwnedAudioBuffer::new(4, 1, 8_000);
        assert!(matches!(
            writer.write_frames(&source),
            Err(GraphError::Logic(_))
        ));
    }
}
