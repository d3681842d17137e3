use std::sync::Arc;

use crate::{
    AudioBuffer, DspProcessor, Grain, GrainCloud, GraphResult, ProcessContext, SampleLocation,
};

/// Renders the grains of a [GrainCloud] into a stereo output
///
/// The player owns the grains that are sounding. It adopts newly spawned grains at the
/// start of every block and hands finished ones back to the cloud at the end, so the
/// worker threads never touch a grain while it is being rendered.
pub struct GrainPlayer {
    cloud: Arc<GrainCloud>,
    playing: Vec<Grain>,
}

impl GrainPlayer {
    pub fn new(cloud: Arc<GrainCloud>) -> Self {
        let capacity = cloud.capacity();
        Self {
            cloud,
            playing: Vec::with_capacity(capacity),
        }
    }

    pub fn cloud(&self) -> &Arc<GrainCloud> {
        &self.cloud
    }

    /// The number of grains currently sounding
    pub fn playing_count(&self) -> usize {
        self.playing.len()
    }

    fn adopt_grains(&mut self) {
        if self.cloud.take_reset_request() {
            for grain in self.playing.drain(..) {
                self.cloud.retire(grain);
            }
        }

        while let Some(grain) = self.cloud.take_incoming() {
            self.playing.push(grain);
        }
    }

    fn retire_finished_grains(&mut self) {
        let mut index = 0;
        while index < self.playing.len() {
            if self.playing[index].is_finished() {
                let grain = self.playing.swap_remove(index);
                self.cloud.retire(grain);
            } else {
                index += 1;
            }
        }
    }
}

impl DspProcessor for GrainPlayer {
    fn channel_count(&self) -> usize {
        2
    }

    fn is_active(&self) -> bool {
        self.cloud.is_playing() || !self.playing.is_empty()
    }

    fn process_audio(&mut self, context: &mut ProcessContext) -> GraphResult<()> {
        let frame_count = context.frame_count();
        let channel_count = context.channel_count();

        context.output_buffer.clear();

        if channel_count != 2 {
            log::error!("A grain player needs a stereo output, got {channel_count} channels");
            return Ok(());
        }

        self.adopt_grains();

        let table = self
            .cloud
            .samples()
            .get_channel_data(SampleLocation::origin());

        for grain in self.playing.iter_mut() {
            grain.render(table, context.output_buffer, frame_count);
        }

        self.retire_finished_grains();
        self.cloud.stamp_block();

        Ok(())
    }
}
