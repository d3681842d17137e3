/// Settings shared by every node created from a [crate::Context]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// The frame rate of the graph
    pub sample_rate: usize,

    /// The block size the host is expected to pull
    pub block_size: usize,

    /// The largest block any port, cache or scratch buffer is sized for
    pub max_buffer_frames: usize,

    /// The channel count of the IO root
    pub output_channel_count: usize,

    /// The size of the grain pool of each grain cloud
    pub max_grains: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            block_size: 512,
            max_buffer_frames: 8_192,
            output_channel_count: 2,
            max_grains: 500,
        }
    }
}

impl EngineOptions {
    pub fn with_sample_rate(mut self, sample_rate: usize) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self.max_buffer_frames = self.max_buffer_frames.max(block_size);
        self
    }

    pub fn with_max_buffer_frames(mut self, max_buffer_frames: usize) -> Self {
        self.max_buffer_frames = max_buffer_frames.max(1);
        self
    }

    pub fn with_output_channel_count(mut self, output_channel_count: usize) -> Self {
        self.output_channel_count = output_channel_count;
        self
    }

    pub fn with_max_grains(mut self, max_grains: usize) -> Self {
        self.max_grains = max_grains;
        self
    }
}
