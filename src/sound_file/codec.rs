use crate::{AudioBuffer, GraphResult};

/// The shape of a sound file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoundFileInfo {
    pub channel_count: usize,
    pub frame_rate: usize,
    pub frame_count: usize,
}

impl SoundFileInfo {
    pub fn duration_in_seconds(&self) -> f64 {
        if self.frame_rate == 0 {
            return 0.0;
        }

        self.frame_count as f64 / self.frame_rate as f64
    }
}

/// The backing store a [crate::SoundFilePlayer] reads from
pub trait SoundFileReader: Send {
    fn info(&self) -> SoundFileInfo;

    /// Move the read cursor to a frame
    fn seek(&mut self, frame: usize) -> GraphResult<()>;

    /// Read up to `frame_count` frames from the cursor into the start of `destination`
    ///
    /// Returns the number of frames read, which is short at the end of the file.
    /// Channels beyond the width of `destination` are skipped.
    fn read_frames(
        &mut self,
        destination: &mut dyn AudioBuffer,
        frame_count: usize,
    ) -> GraphResult<usize>;
}

/// A sink for rendered audio
pub trait SoundFileWriter: Send {
    /// Append every frame of `source`
    fn write_frames(&mut self, source: &dyn AudioBuffer) -> GraphResult<()>;

    /// Flush the file; further writes fail
    fn finalize(&mut self) -> GraphResult<()>;
}
