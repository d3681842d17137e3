use std::sync::Arc;

use approx::assert_relative_eq;
use itertools::izip;
use unitgen::{
    create_engine, AudioBuffer, AudioProcess, Context, EngineOptions, Io, Mixer, Node,
    OwnedAudioBuffer, SampleLocation, SoundCue, SoundFilePlayer, SoundFileWriter, WavWriter,
};

struct Fixture {
    sample_rate: usize,
    context: Context,
    io: Io,
}

impl Fixture {
    fn new() -> Self {
        let sample_rate = 48_000;
        let (context, io) = create_engine(EngineOptions::default().with_sample_rate(sample_rate));

        Self {
            sample_rate,
            context,
            io,
        }
    }

    fn process(&mut self, frame_count: usize, channel_count: usize) -> OwnedAudioBuffer {
        let mut output = OwnedAudioBuffer::new(frame_count, channel_count, self.sample_rate);
        self.io.process(&mut output);
        output
    }

    fn ramp_player(&self, frame_count: usize) -> Node<SoundFilePlayer> {
        let samples = OwnedAudioBuffer::from_channels(&[ramp(frame_count)], self.sample_rate);
        Node::new(
            &self.context,
            SoundFilePlayer::from_samples(&self.context, samples).unwrap(),
        )
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.context.shutdown();
    }
}

fn ramp(frame_count: usize) -> Vec<f32> {
    (0..frame_count).map(|frame| frame as f32 / 100.0).collect()
}

fn mono(buffer: &OwnedAudioBuffer) -> Vec<f32> {
    buffer.get_channel_data(SampleLocation::origin()).to_vec()
}

#[test]
fn player_runs_out_through_the_engine() {
    let mut fixture = Fixture::new();
    let player = fixture.ramp_player(100);
    fixture.context.set_root(&player);

    let expected = ramp(100);
    for block in 0..3 {
        let output = fixture.process(30, 1);
        assert_eq!(mono(&output), &expected[block * 30..(block + 1) * 30]);
    }

    let last = mono(&fixture.process(30, 1));
    assert_eq!(&last[..10], &expected[90..]);
    assert!(last[10..].iter().all(|sample| *sample == 0.0));
    assert!(!player.generator().is_active());
}

#[test]
fn looping_player_never_runs_out() {
    let mut fixture = Fixture::new();
    let player = fixture.ramp_player(100);
    player.lock().set_looping(true);
    fixture.context.set_root(&player);

    let played: Vec<f32> = (0..5)
        .flat_map(|_| mono(&fixture.process(64, 1)))
        .collect();

    let expected = ramp(100);
    for (frame, sample) in played.iter().enumerate() {
        assert_eq!(*sample, expected[frame % 100]);
    }
    assert!(player.generator().is_active());
}

#[test]
fn wav_file_round_trips_through_a_player() {
    let mut fixture = Fixture::new();
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("tone.wav");

    let source = OwnedAudioBuffer::sine(512, 2, fixture.sample_rate, 440.0, 0.5);
    let mut writer = WavWriter::create(&path, 2, fixture.sample_rate).unwrap();
    writer.write_frames(&source).unwrap();
    writer.finalize().unwrap();

    let player = Node::new(
        &fixture.context,
        SoundFilePlayer::open_wav(&fixture.context, &path).unwrap(),
    );
    assert!(player.lock().is_cached());
    assert_eq!(player.lock().duration(), 512);
    fixture.context.set_root(&player);

    let output = fixture.process(512, 2);

    for channel in 0..2 {
        for (expected, actual) in izip!(
            source.get_channel_data(SampleLocation::channel(channel)),
            output.get_channel_data(SampleLocation::channel(channel))
        ) {
            assert_relative_eq!(*expected, *actual);
        }
    }
}

#[test]
fn cues_share_one_cached_file() {
    let mut fixture = Fixture::new();
    let samples = Arc::new(OwnedAudioBuffer::from_channels(
        &[ramp(100)],
        fixture.sample_rate,
    ));

    let cues = SoundCue::parse_list("# drum hits\nkick 0 10\n\nsnare 50 60\n").unwrap();
    assert_eq!(cues.len(), 2);

    let mixer = Node::new(&fixture.context, Mixer::new(&fixture.context, 1));
    let nodes: Vec<_> = cues
        .into_iter()
        .map(|cue| Node::new(&fixture.context, cue.with_samples(samples.clone())))
        .collect();
    for node in nodes.iter() {
        mixer.lock().add_input(node);
    }
    fixture.context.set_root(&mixer);

    let output = mono(&fixture.process(16, 1));

    let expected = ramp(100);
    for frame in 0..10 {
        assert_relative_eq!(output[frame], expected[frame] + expected[50 + frame]);
    }
    assert!(output[10..].iter().all(|sample| *sample == 0.0));

    assert_eq!(nodes[0].lock().name(), "kick");
    assert_eq!(nodes[1].lock().name(), "snare");
}

#[test]
fn retriggered_player_plays_its_region_again() {
    let mut fixture = Fixture::new();
    let player = fixture.ramp_player(100);
    {
        let mut player = player.lock();
        player.set_start(20);
        player.set_stop(28);
        player.trigger();
    }
    fixture.context.set_root(&player);

    let expected = ramp(100);
    assert_eq!(&mono(&fixture.process(8, 1)), &expected[20..28]);
    assert!(mono(&fixture.process(8, 1)).iter().all(|sample| *sample == 0.0));

    player.lock().trigger();
    assert_eq!(&mono(&fixture.process(8, 1)), &expected[20..28]);
}
