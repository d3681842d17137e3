use std::sync::Arc;

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};

use crate::{BlockObserver, Context, DspProcessor, GraphResult, Id, ProcessContext};

use super::unit_generator::{PullSource, UnitGenerator};

/// A shared, type-erased handle to a node in the graph
///
/// This is what consumers hold: ports, mixers, routers and the IO root all pull their
/// inputs through a `GraphNode`. The graph must be acyclic; a node that ends up pulling
/// itself deadlocks.
#[derive(Clone)]
pub struct GraphNode {
    id: Id,
    inner: Arc<Mutex<dyn PullSource>>,
}

impl GraphNode {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn channel_count(&self) -> usize {
        self.inner.lock().channel_count()
    }

    /// Whether the node still has signal to produce
    pub fn is_active(&self) -> bool {
        self.inner.lock().is_active()
    }

    /// The number of consumers currently registered
    pub fn output_count(&self) -> usize {
        self.inner.lock().output_count()
    }

    /// How many blocks the node has actually computed (cache replays excluded)
    pub fn blocks_computed(&self) -> u64 {
        self.inner.lock().blocks_computed()
    }

    /// Register a consumer
    pub fn add_output(&self) {
        self.inner.lock().add_output();
    }

    /// Unregister a consumer
    pub fn remove_output(&self) {
        self.inner.lock().remove_output();
    }

    /// Fill `context.output_buffer` with the node's block for `context.sequence`
    pub fn next_buffer(&self, context: &mut ProcessContext) -> GraphResult<()> {
        self.inner.lock().next_buffer(context)
    }
}

impl PartialEq for GraphNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GraphNode {}

impl std::fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphNode").field("id", &self.id).finish()
    }
}

/// A typed handle to a node, giving access to its setters
///
/// ```ignore
/// let filter = Node::new(&context, Filter::butterworth(&context, ButterworthType::LowPass, 1_000.0));
/// filter.lock().set_frequency(2_000.0);
/// ```
pub struct Node<P: DspProcessor> {
    id: Id,
    inner: Arc<Mutex<UnitGenerator<P>>>,
}

impl<P: DspProcessor + 'static> Node<P> {
    pub fn new(context: &Context, processor: P) -> Self {
        let unit_generator = UnitGenerator::new(
            processor,
            context.options().max_buffer_frames,
            context.sample_rate(),
        )
        .with_cache_channels(context.options().output_channel_count);

        Self {
            id: unit_generator.id(),
            inner: Arc::new(Mutex::new(unit_generator)),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Lock the node to call its setters
    ///
    /// Hold the guard only briefly: the audio thread waits on it.
    pub fn lock(&self) -> MappedMutexGuard<'_, P> {
        MutexGuard::map(self.inner.lock(), |unit_generator| {
            &mut unit_generator.processor
        })
    }

    /// The type-erased handle used to connect this node to consumers
    pub fn generator(&self) -> GraphNode {
        let inner: Arc<Mutex<dyn PullSource>> = self.inner.clone();
        GraphNode { id: self.id, inner }
    }

    pub fn add_observer(&self, observer: impl BlockObserver + 'static) {
        self.inner.lock().add_observer(Box::new(observer));
    }

    pub fn clear_observers(&self) {
        self.inner.lock().clear_observers();
    }

    pub fn next_buffer(&self, context: &mut ProcessContext) -> GraphResult<()> {
        self.inner.lock().next_buffer(context)
    }

    pub fn blocks_computed(&self) -> u64 {
        self.inner.lock().blocks_computed()
    }
}

impl<P: DspProcessor> Clone for Node<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: self.inner.clone(),
        }
    }
}

impl<P: DspProcessor + 'static> From<&Node<P>> for GraphNode {
    fn from(node: &Node<P>) -> Self {
        node.generator()
    }
}

impl From<&GraphNode> for GraphNode {
    fn from(node: &GraphNode) -> Self {
        node.clone()
    }
}
