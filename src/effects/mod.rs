mod filter;
mod mixing;
mod routing;
mod spatial;

pub use filter::{
    ButterworthType, Filter, FilterCoefficients, FilterDesign, Moog, MAX_COEFFICIENTS,
};
pub use mixing::Mixer;
pub use routing::{ChannelRemapper, Joiner, RemapMode, Splitter};
pub use spatial::{NtoMPanner, Panner, SpeakerLayout, StereoWidth};
