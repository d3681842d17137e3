use approx::assert_relative_eq;
use itertools::Itertools;
use unitgen::{
    create_engine, AudioBuffer, AudioProcess, ChannelMappedBuffer, ChannelRemapper, Constant,
    Context, EngineOptions, GraphError, Io, Joiner, Node, OwnedAudioBuffer, RemapMode,
    SampleLocation, Splitter,
};

struct Fixture {
    sample_rate: usize,
    frame_count: usize,
    context: Context,
    io: Io,
    stereo: Node<Joiner>,
}

impl Fixture {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let sample_rate = 44_100;
        let (context, io) = create_engine(EngineOptions::default().with_sample_rate(sample_rate));

        let left = Node::new(&context, Constant::new(1.0));
        let right = Node::new(&context, Constant::new(2.0));
        let stereo = Node::new(&context, Joiner::new(&context, [&left, &right]));

        Self {
            sample_rate,
            frame_count: 128,
            context,
            io,
            stereo,
        }
    }

    fn process(&mut self, channel_count: usize) -> OwnedAudioBuffer {
        let mut output = OwnedAudioBuffer::new(self.frame_count, channel_count, self.sample_rate);
        output.fill_with_value(0.5);
        self.io.process(&mut output);
        output
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.context.shutdown();
    }
}

fn assert_channel(buffer: &dyn AudioBuffer, channel: usize, expected: f32) {
    for sample in buffer.get_channel_data(SampleLocation::channel(channel)) {
        assert_relative_eq!(*sample, expected);
    }
}

#[test]
fn joiner_places_each_input_on_its_own_channel() {
    let mut fixture = Fixture::new();
    fixture.context.set_root(&fixture.stereo);

    let output = fixture.process(2);

    assert_channel(&output, 0, 1.0);
    assert_channel(&output, 1, 2.0);
}

#[test]
fn splitter_takes_one_channel_of_a_joined_pair() {
    let mut fixture = Fixture::new();
    let right = Node::new(
        &fixture.context,
        Splitter::new(&fixture.context, &fixture.stereo, 1),
    );
    fixture.context.set_root(&right);

    let output = fixture.process(1);

    assert_channel(&output, 0, 2.0);
}

#[test]
fn splitting_a_missing_channel_is_silent() {
    let mut fixture = Fixture::new();
    let missing = Node::new(
        &fixture.context,
        Splitter::new(&fixture.context, &fixture.stereo, 5),
    );
    fixture.context.set_root(&missing);

    let output = fixture.process(1);

    assert!(output.channel_is_silent(0));
}

#[test]
fn joiner_asked_for_the_wrong_width_is_silent() {
    let mut fixture = Fixture::new();
    fixture.context.set_root(&fixture.stereo);

    let output = fixture.process(3);

    assert!((0..3).all(|channel| output.channel_is_silent(channel)));
}

#[test]
fn stereo_to_mono_averages_both_sides() {
    let mut fixture = Fixture::new();
    let mono = Node::new(
        &fixture.context,
        ChannelRemapper::new(&fixture.context, &fixture.stereo, RemapMode::StereoToMono, 2)
            .unwrap(),
    );
    fixture.context.set_root(&mono);

    let output = fixture.process(2);

    assert_channel(&output, 0, 1.5);
    assert_channel(&output, 1, 1.5);
}

#[test]
fn channel_map_swaps_and_scales() {
    let mut fixture = Fixture::new();
    let mut remapper = ChannelRemapper::new(
        &fixture.context,
        &fixture.stereo,
        RemapMode::Map(vec![1, 0]),
        2,
    )
    .unwrap();
    remapper.set_gain(1, 0.5).unwrap();
    let swapped = Node::new(&fixture.context, remapper);
    fixture.context.set_root(&swapped);

    let output = fixture.process(2);

    assert_channel(&output, 0, 2.0);
    assert_channel(&output, 1, 0.5);
}

#[test]
fn mono_sources_cannot_be_averaged() {
    let fixture = Fixture::new();
    let mono = Node::new(&fixture.context, Constant::new(1.0));

    let result = ChannelRemapper::new(&fixture.context, &mono, RemapMode::StereoToMono, 1);

    assert!(matches!(result, Err(GraphError::Value(_))));
}

#[test]
fn driver_channel_map_routes_the_root_to_device_channels() {
    let mut fixture = Fixture::new();
    fixture.context.set_root(&fixture.stereo);

    let mut device = OwnedAudioBuffer::new(fixture.frame_count, 4, fixture.sample_rate);
    let channel_map = [3, 0];
    {
        let mut mapped = ChannelMappedBuffer::new(&mut device, &channel_map).unwrap();
        fixture.io.process(&mut mapped);
    }

    let levels = (0..4)
        .map(|channel| device.get_sample(SampleLocation::new(channel, 0)))
        .collect_vec();

    assert_eq!(levels, vec![2.0, 0.0, 0.0, 1.0]);
}
