use crossbeam::channel::{Receiver, Sender};

use crate::{utility::StopSignal, EngineOptions, GraphNode};

pub(crate) enum IoCommand {
    SetRoot(GraphNode),
    ClearRoot,
}

/// The control side of an engine
///
/// Nodes are created against a context so they pick up its options. The context also
/// attaches graphs to the [crate::Io] it was created with, and owns the stop signal
/// that worker threads sleep on.
pub struct Context {
    options: EngineOptions,
    stop_signal: StopSignal,
    command_tx: Sender<IoCommand>,
    garbage_rx: Receiver<GraphNode>,
}

impl Context {
    pub(crate) fn new(
        options: EngineOptions,
        command_tx: Sender<IoCommand>,
        garbage_rx: Receiver<GraphNode>,
    ) -> Self {
        Self {
            options,
            stop_signal: StopSignal::default(),
            command_tx,
            garbage_rx,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn sample_rate(&self) -> usize {
        self.options.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.options.block_size
    }

    /// The signal every worker of this engine sleeps on
    pub fn stop_signal(&self) -> StopSignal {
        self.stop_signal.clone()
    }

    /// Make `root` the node pulled by the IO on its next block
    pub fn set_root(&self, root: impl Into<GraphNode>) {
        self.send(IoCommand::SetRoot(root.into()));
    }

    /// Detach the graph so the IO outputs silence
    pub fn clear_root(&self) {
        self.send(IoCommand::ClearRoot);
    }

    /// Drop any roots the IO has detached, returning how many there were
    pub fn collect_garbage(&self) -> usize {
        self.garbage_rx.try_iter().count()
    }

    /// Raise the stop signal, waking every worker that sleeps on it
    pub fn shutdown(&self) {
        log::debug!("Stopping engine workers");
        self.stop_signal.interrupt();
    }

    fn send(&self, command: IoCommand) {
        if self.command_tx.send(command).is_err() {
            log::warn!("The IO for this context has been dropped");
        }
    }
}
