use crate::{AudioBuffer, Id};

/// A listener told about every block a node computes
///
/// Attach one with [crate::Node::add_observer]. Observers run on the audio thread
/// straight after the block is computed, so they must not block or allocate.
pub trait BlockObserver: Send {
    fn block_computed(&mut self, node_id: Id, buffer: &dyn AudioBuffer);
}

impl<F> BlockObserver for F
where
    F: FnMut(Id, &dyn AudioBuffer) + Send,
{
    fn block_computed(&mut self, node_id: Id, buffer: &dyn AudioBuffer) {
        self(node_id, buffer)
    }
}
