mod channel_remapper;
mod joiner;
mod splitter;

pub use channel_remapper::{ChannelRemapper, RemapMode};
pub use joiner::Joiner;
pub use splitter::Splitter;
