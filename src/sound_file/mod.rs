mod codec;
mod memory_sound_file;
mod sound_cue;
mod sound_file_player;
#[cfg(feature = "wav")]
mod wav;

pub use codec::{SoundFileInfo, SoundFileReader, SoundFileWriter};
pub use memory_sound_file::MemorySoundFile;
pub use sound_cue::SoundCue;
pub use sound_file_player::SoundFilePlayer;
#[cfg(feature = "wav")]
pub use wav::{WavReader, WavWriter};
