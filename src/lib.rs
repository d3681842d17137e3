//! unitgen is a pull-based graph of unit generators for real-time audio
//!
//! You can use it to:
//! - Create an engine with a set of options
//! - Create oscillators, filters, sound-file players, panners, mixers and grain clouds
//! - Drive any input of a node with a fixed value or with another node
//! - Pull the graph block by block from an audio callback
//!
//! A node with several consumers computes each block once and replays it to the others,
//! and every node adapts its output to the channel count its consumer asks for.
//!
//! # Example
//!
//! ```rust
//! use unitgen::{
//!     create_engine, AudioProcess, EngineOptions, Node, OwnedAudioBuffer, Panner, Scalable,
//!     Sine,
//! };
//!
//! let (context, mut io) = create_engine(EngineOptions::default());
//!
//! let sine = Node::new(&context, Sine::new(&context, 440.0));
//! sine.lock().set_scale(0.25);
//!
//! let lfo = Node::new(&context, Sine::new(&context, 0.5));
//! let panner = Node::new(&context, Panner::new(&context, &sine, &lfo));
//!
//! context.set_root(&panner);
//!
//! // Call `io.process(...)` from the audio callback with the output buffer
//! let mut output = OwnedAudioBuffer::new(512, 2, 44_100);
//! io.process(&mut output);
//! ```

mod buffer;
mod effects;
mod engine;
mod error;
mod graph;
mod granular;
mod sound_file;
mod sources;
mod utility;

pub use buffer::{
    deinterleave, interleave, interleave_and_remap, AudioBuffer, BorrowedAudioBuffer,
    ChannelMappedBuffer, MutableBorrowedAudioBuffer, OwnedAudioBuffer, SampleLocation,
    SampleRange,
};

pub use effects::{
    ButterworthType, ChannelRemapper, Filter, FilterCoefficients, FilterDesign, Joiner, Mixer,
    Moog, NtoMPanner, Panner, RemapMode, SpeakerLayout, Splitter, StereoWidth, MAX_COEFFICIENTS,
};

pub use engine::{create_engine, AudioProcess, Context, EngineOptions, Io};

pub use error::{GraphError, GraphResult};

pub use graph::{
    BlockObserver, ControlInputs, ControlKey, Controllable, CopyPolicy, DspProcessor, Effect,
    FanOutCache, GraphNode, Id, Node, Phase, Phased, Port, PortInput, ProcessContext,
    PullSource, Scalable, UnitGenerator,
};

pub use granular::{Grain, GrainCloud, GrainPlayer, RandomRange};

pub use sound_file::{
    MemorySoundFile, SoundCue, SoundFileInfo, SoundFilePlayer, SoundFileReader, SoundFileWriter,
};

#[cfg(feature = "wav")]
pub use sound_file::{WavReader, WavWriter};

pub use sources::{Constant, LineSegment, Sine, WavetableOscillator, WhiteNoise};

pub use utility::{
    random_between, Level, PeakMeter, SleepOutcome, StopSignal, Timestamp, SILENCE_DB,
};
