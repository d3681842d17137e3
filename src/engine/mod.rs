mod audio_process;
mod context;
mod io;
mod options;

pub use audio_process::AudioProcess;
pub use context::Context;
pub use io::Io;
pub use options::EngineOptions;

/// Garbage handed back from the IO between two calls to [Context::collect_garbage]
const GARBAGE_CAPACITY: usize = 64;

/// Create an engine
///
/// This returns a pair:
///
/// * The [Context] is used to create nodes and attach them to the IO. It should be kept
///   in scope for the lifetime of the graph.
///
/// * The [Io] generates audio. It might be passed to a different thread if used in a
///   realtime context, or kept in the main thread if used offline.
pub fn create_engine(options: EngineOptions) -> (Context, Io) {
    let (command_tx, command_rx) = crossbeam::channel::unbounded();
    let (garbage_tx, garbage_rx) = crossbeam::channel::bounded(GARBAGE_CAPACITY);

    let io = Io::new(&options, command_rx, garbage_tx);
    let context = Context::new(options, command_tx, garbage_rx);

    (context, io)
}
