/// The position of a single sample in a buffer
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleLocation {
    /// Channel index
    pub channel: usize,
    /// Frame index
    pub frame: usize,
}

impl SampleLocation {
    /// Create a location from a channel and a frame
    pub fn new(channel: usize, frame: usize) -> Self {
        Self { channel, frame }
    }

    /// The first frame of a channel
    pub fn channel(channel: usize) -> Self {
        Self { channel, frame: 0 }
    }

    /// A frame in the first channel
    pub fn frame(frame: usize) -> Self {
        Self { channel: 0, frame }
    }

    /// The first frame of the first channel
    pub fn origin() -> Self {
        Self::default()
    }

    /// Move the location by a number of channels
    pub fn offset_channels(&self, channel_count: usize) -> Self {
        Self {
            channel: self.channel + channel_count,
            frame: self.frame,
        }
    }

    /// Move the location by a number of frames
    pub fn offset_frames(&self, frame_count: usize) -> Self {
        Self {
            channel: self.channel,
            frame: self.frame + frame_count,
        }
    }

    /// The same frame on a different channel
    pub fn with_channel(&self, channel: usize) -> Self {
        Self {
            channel,
            frame: self.frame,
        }
    }
}

/// A rectangular region of a buffer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SampleRange {
    pub channel: usize,
    pub frame: usize,
    pub channel_count: usize,
    pub frame_count: usize,
}

impl SampleRange {
    pub fn new(channel: usize, frame: usize, channel_count: usize, frame_count: usize) -> Self {
        Self {
            channel,
            frame,
            channel_count,
            frame_count,
        }
    }

    pub fn channel_and_frame_count(channel_count: usize, frame_count: usize) -> Self {
        Self::new(0, 0, channel_count, frame_count)
    }

    pub fn fits_within(&self, channel_count: usize, frame_count: usize) -> bool {
        self.channel + self.channel_count <= channel_count
            && self.frame + self.frame_count <= frame_count
    }
}
