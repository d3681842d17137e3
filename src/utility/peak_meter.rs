use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use atomic_float::AtomicF32;

use crate::{AudioBuffer, BlockObserver, Id, Level, SampleLocation};

struct Shared {
    peak: AtomicF32,
    blocks: AtomicU64,
}

/// Holds the highest absolute sample seen by the node it observes
///
/// Attach a clone with [crate::Node::add_observer] and read the level from any thread.
#[derive(Clone)]
pub struct PeakMeter {
    shared: Arc<Shared>,
}

impl Default for PeakMeter {
    fn default() -> Self {
        Self {
            shared: Arc::new(Shared {
                peak: AtomicF32::new(0.0),
                blocks: AtomicU64::new(0),
            }),
        }
    }
}

impl PeakMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The peak since the last reset
    pub fn level(&self) -> Level {
        Level::from_linear(self.shared.peak.load(Ordering::Acquire))
    }

    /// The number of blocks measured
    pub fn block_count(&self) -> u64 {
        self.shared.blocks.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.shared.peak.store(0.0, Ordering::Release);
    }
}

impl BlockObserver for PeakMeter {
    fn block_computed(&mut self, _node_id: Id, buffer: &dyn AudioBuffer) {
        let peak = (0..buffer.channel_count())
            .flat_map(|channel| buffer.get_channel_data(SampleLocation::channel(channel)))
            .fold(0.0_f32, |peak, sample| peak.max(sample.abs()));

        self.shared.peak.fetch_max(peak, Ordering::AcqRel);
        self.shared.blocks.fetch_add(1, Ordering::AcqRel);
    }
}
