mod level;
mod peak_meter;
mod random;
mod stop_signal;
mod timestamp;

pub use level::{Level, SILENCE_DB};
pub use peak_meter::PeakMeter;
pub use random::random_between;
pub use stop_signal::{SleepOutcome, StopSignal};
pub use timestamp::Timestamp;
