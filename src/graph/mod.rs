mod control_inputs;
mod controllable;
mod dsp_processor;
mod fan_out_cache;
mod graph_node;
mod id;
mod observer;
mod port;
mod process_context;
mod unit_generator;

pub use control_inputs::{ControlInputs, ControlKey};
pub use controllable::{Controllable, Effect, Phase, Phased, Scalable};
pub use dsp_processor::{CopyPolicy, DspProcessor};
pub use fan_out_cache::FanOutCache;
pub use graph_node::{GraphNode, Node};
pub use id::Id;
pub use observer::BlockObserver;
pub use port::{Port, PortInput};
pub use process_context::ProcessContext;
pub use unit_generator::{PullSource, UnitGenerator};
