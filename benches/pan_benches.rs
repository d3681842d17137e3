use criterion::{criterion_group, criterion_main, Criterion};
use unitgen::{
    create_engine, AudioProcess, Context, EngineOptions, Io, LineSegment, Node, NtoMPanner,
    OwnedAudioBuffer, Panner, Sine, SpeakerLayout,
};

struct Fixture {
    io: Io,
    context: Context,
    source: Node<Sine>,
    output_buffer: OwnedAudioBuffer,
}

impl Fixture {
    fn new(channel_count: usize) -> Self {
        let sample_rate = 48_000;
        let frame_count = 4_096;

        let (context, io) = create_engine(
            EngineOptions::default()
                .with_sample_rate(sample_rate)
                .with_block_size(frame_count)
                .with_output_channel_count(channel_count),
        );

        let source = Node::new(&context, Sine::new(&context, 440.0));

        Self {
            io,
            context,
            source,
            output_buffer: OwnedAudioBuffer::new(frame_count, channel_count, sample_rate),
        }
    }

    fn process(&mut self) {
        self.io.process(&mut self.output_buffer);
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.context.shutdown();
    }
}

fn pan_benchmarks(c: &mut Criterion) {
    c.benchmark_group("Pan");

    c.bench_function("process fixed pan", |b| {
        let mut fixture = Fixture::new(2);
        let panner = Node::new(
            &fixture.context,
            Panner::new(&fixture.context, &fixture.source, 0.25),
        );
        fixture.context.set_root(&panner);

        b.iter(|| fixture.process());
    });

    c.bench_function("process pan with ramp", |b| {
        let mut fixture = Fixture::new(2);
        let ramp = Node::new(
            &fixture.context,
            LineSegment::new(&fixture.context, -1.0, 1.0, 48_000),
        );
        let panner = Node::new(
            &fixture.context,
            Panner::new(&fixture.context, &fixture.source, &ramp),
        );
        fixture.context.set_root(&panner);

        b.iter(|| fixture.process());
    });

    c.bench_function("process 5.1 panner", |b| {
        let mut fixture = Fixture::new(5);
        let panner = Node::new(
            &fixture.context,
            NtoMPanner::new(
                &fixture.context,
                &fixture.source,
                SpeakerLayout::itu_5_1(10.0),
            ),
        );
        panner.lock().set_position(3.0, 4.0);
        fixture.context.set_root(&panner);

        b.iter(|| fixture.process());
    });
}

criterion_group!(benches, pan_benchmarks);

criterion_main!(benches);
