use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use atomic_float::AtomicF32;
use crossbeam::queue::ArrayQueue;
use parking_lot::Mutex;
use rand::Rng;

use crate::{
    utility::{random_between, SleepOutcome, StopSignal},
    AudioBuffer, Context, GraphError, GraphResult, Grain, OwnedAudioBuffer,
};

const REAPER_START_DELAY: Duration = Duration::from_millis(200);
const REAPER_INTERVAL: Duration = Duration::from_millis(500);
const MINIMUM_DENSITY: f32 = 0.1;

/// A parameter drawn uniformly from `base ± range` for every grain
///
/// Both halves can be changed while the cloud is playing.
pub struct RandomRange {
    base: AtomicF32,
    range: AtomicF32,
}

impl RandomRange {
    fn new(base: f32, range: f32) -> Self {
        Self {
            base: AtomicF32::new(base),
            range: AtomicF32::new(range),
        }
    }

    pub fn set(&self, base: f32, range: f32) {
        self.base.store(base, Ordering::Relaxed);
        self.range.store(range, Ordering::Relaxed);
    }

    pub fn base(&self) -> f32 {
        self.base.load(Ordering::Relaxed)
    }

    pub fn range(&self) -> f32 {
        self.range.load(Ordering::Relaxed)
    }

    pub fn draw(&self, random_generator: &mut impl Rng) -> f32 {
        random_between(random_generator, self.base(), self.range())
    }
}

/// The shared state of a granular synthesizer
///
/// Grains live in a fixed pool that is allocated once. A grain moves from the `free`
/// queue to `incoming` when it is spawned, is adopted by the [crate::GrainPlayer] on
/// its next block, goes to `finished` once its time reaches its duration and back to
/// `free` when it is reaped. Every queue can hold the whole pool, so no hand-off ever
/// fails and the audio thread never waits on the workers.
pub struct GrainCloud {
    /// Playback rate, 1 being the original speed
    pub rate: RandomRange,
    /// Start position as a fraction of the samples
    pub offset: RandomRange,
    /// Grain length in seconds
    pub duration: RandomRange,
    /// Grains per second
    pub density: RandomRange,
    /// Pan from 0 (left) to 1 (right)
    pub width: RandomRange,
    pub volume: RandomRange,
    /// Position of the envelope peak as a fraction of the duration
    pub envelope: RandomRange,

    samples: Arc<OwnedAudioBuffer>,
    capacity: usize,
    free: ArrayQueue<Grain>,
    incoming: ArrayQueue<Grain>,
    finished: ArrayQueue<Grain>,
    reset_requested: AtomicBool,

    sample_rate: usize,
    block_size: usize,
    epoch: Instant,
    last_block_nanos: AtomicU64,

    playing: AtomicBool,
    stop_signal: StopSignal,
    engine_stop_signal: StopSignal,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl GrainCloud {
    /// Create a cloud over the first channel of `samples`, with a pool of
    /// [crate::EngineOptions::max_grains] grains
    pub fn new(context: &Context, samples: Arc<OwnedAudioBuffer>) -> GraphResult<Arc<Self>> {
        if samples.frame_count() == 0 || samples.channel_count() == 0 {
            return Err(GraphError::Value(
                "a grain cloud needs at least one sample".to_string(),
            ));
        }

        let capacity = context.options().max_grains;
        if capacity == 0 {
            return Err(GraphError::Value(
                "a grain cloud needs room for at least one grain".to_string(),
            ));
        }

        let free = ArrayQueue::new(capacity);
        for _ in 0..capacity {
            let _ = free.push(Grain::default());
        }

        log::info!("Created grain pool: {capacity} available");

        Ok(Arc::new(Self {
            rate: RandomRange::new(1.0, 0.0),
            offset: RandomRange::new(0.5, 0.5),
            duration: RandomRange::new(0.1, 0.05),
            density: RandomRange::new(20.0, 5.0),
            width: RandomRange::new(0.5, 0.5),
            volume: RandomRange::new(1.0, 0.0),
            envelope: RandomRange::new(0.5, 0.0),
            samples,
            capacity,
            free,
            incoming: ArrayQueue::new(capacity),
            finished: ArrayQueue::new(capacity),
            reset_requested: AtomicBool::new(false),
            sample_rate: context.sample_rate(),
            block_size: context.block_size(),
            epoch: Instant::now(),
            last_block_nanos: AtomicU64::new(0),
            playing: AtomicBool::new(false),
            stop_signal: context.stop_signal().child(),
            engine_stop_signal: context.stop_signal(),
            workers: Mutex::new(Vec::new()),
        }))
    }

    pub fn samples(&self) -> &OwnedAudioBuffer {
        &self.samples
    }

    /// The size of the grain pool
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of grains waiting in the free pool
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Take a grain from the pool and fill it with fresh random parameters
    ///
    /// Returns false, without doing anything else, when the pool is empty.
    pub fn spawn_grain(&self, random_generator: &mut impl Rng) -> bool {
        let Some(mut grain) = self.free.pop() else {
            return false;
        };

        let frame_count = self.samples.frame_count() as f32;
        let density = self.density.base();
        let volume = self.volume.draw(random_generator);

        grain.position = self.offset.draw(random_generator) * frame_count;
        grain.duration =
            (self.duration.draw(random_generator) * self.sample_rate as f32).max(0.0);
        grain.rate = self.rate.draw(random_generator);
        grain.amplitude = if density > 0.0 { volume / density } else { volume };
        grain.time = 0.0;
        grain.pan = self.width.draw(random_generator).clamp(0.0, 1.0);
        grain.envelope = self.envelope.draw(random_generator).clamp(0.0, 1.0);
        grain.delay = self.frames_since_last_block();

        if let Err(grain) = self.incoming.push(grain) {
            let _ = self.free.push(grain);
            return false;
        }

        true
    }

    /// Return finished grains to the pool, returning how many there were
    pub fn reap(&self) -> usize {
        let mut count = 0;

        while let Some(grain) = self.finished.pop() {
            let _ = self.free.push(grain);
            count += 1;
        }

        count
    }

    /// Silence every grain
    ///
    /// Grains that haven't reached the player go straight back to the pool. The player
    /// hands back the ones it holds on its next block, to be reaped after that.
    pub fn reset(&self) {
        while let Some(grain) = self.incoming.pop() {
            let _ = self.free.push(grain);
        }

        self.reap();
        self.reset_requested.store(true, Ordering::Release);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Start spawning and reaping grains on two worker threads
    ///
    /// The workers also stop when the engine shuts down, after which they can't be
    /// started again.
    pub fn start_threads(self: &Arc<Self>) -> GraphResult<()> {
        if self.engine_stop_signal.is_interrupted() {
            return Err(GraphError::Logic(
                "grain workers can't start after the engine has shut down".to_string(),
            ));
        }

        let mut workers = self.workers.lock();
        workers.retain(|worker| !worker.is_finished());
        if !workers.is_empty() {
            return Ok(());
        }

        self.stop_signal.reset();
        self.playing.store(true, Ordering::Release);

        log::info!("Starting grain spawner and reaper");

        let cloud = self.clone();
        workers.push(
            thread::Builder::new()
                .name("grain-spawner".to_string())
                .spawn(move || cloud.run_spawner())?,
        );

        let cloud = self.clone();
        workers.push(
            thread::Builder::new()
                .name("grain-reaper".to_string())
                .spawn(move || cloud.run_reaper())?,
        );

        Ok(())
    }

    /// Stop the worker threads and wait for them to exit
    pub fn stop_threads(&self) {
        self.playing.store(false, Ordering::Release);
        self.stop_signal.interrupt();

        let workers: Vec<JoinHandle<()>> = self.workers.lock().drain(..).collect();
        for worker in workers {
            if worker.join().is_err() {
                log::error!("A grain worker panicked");
            }
        }

        log::info!("Stopped grain spawner and reaper");
    }

    pub(crate) fn take_incoming(&self) -> Option<Grain> {
        self.incoming.pop()
    }

    pub(crate) fn retire(&self, grain: Grain) {
        let _ = self.finished.push(grain);
    }

    pub(crate) fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    /// Record the time the player computed a block
    pub(crate) fn stamp_block(&self) {
        let nanos = self.epoch.elapsed().as_nanos().max(1) as u64;
        self.last_block_nanos.store(nanos, Ordering::Release);
    }

    /// How far into the next block a grain spawned now should start
    fn frames_since_last_block(&self) -> usize {
        let last_block = self.last_block_nanos.load(Ordering::Acquire);
        if last_block == 0 {
            return 0;
        }

        let now = self.epoch.elapsed().as_nanos() as u64;
        let elapsed = Duration::from_nanos(now.saturating_sub(last_block));
        let frames = (elapsed.as_secs_f64() * self.sample_rate as f64) as usize;

        frames.min(self.block_size)
    }

    fn should_run(&self) -> bool {
        self.is_playing() && !self.engine_stop_signal.is_interrupted()
    }

    fn run_spawner(&self) {
        let mut random_generator = rand::rng();

        while self.should_run() {
            if !self.spawn_grain(&mut random_generator) {
                log::trace!("No free grains");
            }

            let density = self.density.draw(&mut random_generator).max(MINIMUM_DENSITY);
            let delay = Duration::from_secs_f32(1.0 / density);

            if self.stop_signal.sleep(delay) == SleepOutcome::Interrupted {
                break;
            }
        }

        self.playing.store(false, Ordering::Release);
        log::debug!("Grain spawner exited");
    }

    fn run_reaper(&self) {
        if self.stop_signal.sleep(REAPER_START_DELAY) == SleepOutcome::TimedOut {
            while self.should_run() {
                self.reap();

                if self.stop_signal.sleep(REAPER_INTERVAL) == SleepOutcome::Interrupted {
                    break;
                }
            }
        }

        self.playing.store(false, Ordering::Release);
        log::debug!("Grain reaper exited");
    }
}
