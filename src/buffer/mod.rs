mod audio_buffer;
mod borrowed_audio_buffer;
mod channel_mapped_buffer;
mod interleave;
mod mutable_borrowed_audio_buffer;
mod owned_audio_buffer;
mod sample_location;

pub use audio_buffer::AudioBuffer;
pub use borrowed_audio_buffer::BorrowedAudioBuffer;
pub use channel_mapped_buffer::ChannelMappedBuffer;
pub use interleave::{deinterleave, interleave, interleave_and_remap};
pub use mutable_borrowed_audio_buffer::MutableBorrowedAudioBuffer;
pub use owned_audio_buffer::OwnedAudioBuffer;
pub use sample_location::{SampleLocation, SampleRange};
