mod n_to_m_panner;
mod panner;
mod speaker_layout;
mod stereo_width;

pub use n_to_m_panner::NtoMPanner;
pub use panner::Panner;
pub use speaker_layout::SpeakerLayout;
pub use stereo_width::StereoWidth;
