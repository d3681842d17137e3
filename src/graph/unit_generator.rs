use crate::{AudioBuffer, BlockObserver, DspProcessor, GraphResult, Id, ProcessContext};

use super::fan_out_cache::FanOutCache;

/// The type-erased interface the graph pulls through
pub trait PullSource: Send {
    fn id(&self) -> Id;

    fn channel_count(&self) -> usize;

    fn is_active(&self) -> bool;

    fn output_count(&self) -> usize;

    fn add_output(&mut self);

    fn remove_output(&mut self);

    fn blocks_computed(&self) -> u64;

    /// Fill `context.output_buffer` with the block for `context.sequence`
    fn next_buffer(&mut self, context: &mut ProcessContext) -> GraphResult<()>;
}

/// Wraps a [DspProcessor] with the execution protocol shared by every node
///
/// A block is computed at most once per sequence number. When more than one consumer
/// is connected, the computed block is kept in a [FanOutCache] and replayed for every
/// further request carrying the same sequence number.
pub struct UnitGenerator<P: DspProcessor> {
    id: Id,
    pub(crate) processor: P,
    sequence: u64,
    output_count: usize,
    cache: Option<FanOutCache>,
    cache_capacity: usize,
    cache_channels: usize,
    sample_rate: usize,
    blocks_computed: u64,
    observers: Vec<Box<dyn BlockObserver>>,
}

impl<P: DspProcessor> UnitGenerator<P> {
    pub fn new(processor: P, cache_capacity: usize, sample_rate: usize) -> Self {
        Self {
            id: Id::generate(),
            processor,
            sequence: 0,
            output_count: 0,
            cache: None,
            cache_capacity,
            cache_channels: 1,
            sample_rate,
            blocks_computed: 0,
            observers: Vec::new(),
        }
    }

    /// Reserve fan-out cache room for blocks this wide
    ///
    /// Consumers may ask an expanding node for more channels than it declares, and the
    /// cache has to hold whatever the node produced.
    pub fn with_cache_channels(mut self, channel_count: usize) -> Self {
        self.cache_channels = channel_count.max(1);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn BlockObserver>) {
        self.observers.push(observer);
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    fn should_replay(&self, sequence: u64) -> bool {
        self.output_count > 1 && self.cache.is_some() && sequence <= self.sequence
    }

    fn notify_observers(&mut self, buffer: &dyn AudioBuffer) {
        for observer in self.observers.iter_mut() {
            observer.block_computed(self.id, buffer);
        }
    }
}

impl<P: DspProcessor> PullSource for UnitGenerator<P> {
    fn id(&self) -> Id {
        self.id
    }

    fn channel_count(&self) -> usize {
        self.processor.channel_count()
    }

    fn is_active(&self) -> bool {
        self.processor.is_active()
    }

    fn output_count(&self) -> usize {
        self.output_count
    }

    fn add_output(&mut self) {
        self.output_count += 1;

        if self.output_count > 1 && self.cache.is_none() {
            self.cache = Some(FanOutCache::new(
                self.processor.channel_count().max(self.cache_channels),
                self.cache_capacity,
                self.sample_rate,
            ));
        }
    }

    fn remove_output(&mut self) {
        self.output_count = self.output_count.saturating_sub(1);
    }

    fn blocks_computed(&self) -> u64 {
        self.blocks_computed
    }

    fn next_buffer(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        if self.should_replay(context.sequence) {
            if let Some(cache) = &self.cache {
                cache.replay(context.output_buffer);
            }
            return Ok(());
        }

        self.processor.process_audio(context)?;
        self.blocks_computed += 1;

        if self.output_count > 1 {
            if let Some(cache) = &mut self.cache {
                cache.write(context.output_buffer);
            }
        }

        self.sequence = self.sequence.max(context.sequence);

        if !self.observers.is_empty() {
            self.notify_observers(context.output_buffer);
        }

        Ok(())
    }
}
