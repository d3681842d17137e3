mod grain;
mod grain_cloud;
mod grain_player;

pub use grain::Grain;
pub use grain_cloud::{GrainCloud, RandomRange};
pub use grain_player::GrainPlayer;
