mod constant;
mod line_segment;
mod sine;
mod wavetable_oscillator;
mod white_noise;

pub use constant::Constant;
pub use line_segment::LineSegment;
pub use sine::Sine;
pub use wavetable_oscillator::WavetableOscillator;
pub use white_noise::WhiteNoise;
