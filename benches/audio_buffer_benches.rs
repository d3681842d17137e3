use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use unitgen::{deinterleave, interleave, AudioBuffer, OwnedAudioBuffer, SampleLocation};

fn read_and_write_frame_by_frame() {
    let frame_count = 1024;
    let channel_count = 2;
    let sample_rate = 44_100;

    let mut buffer = OwnedAudioBuffer::new(frame_count, channel_count, sample_rate);

    for frame in 0..buffer.frame_count() {
        for channel in 0..buffer.channel_count() {
            buffer.set_sample(SampleLocation::new(channel, frame), 0.0);
        }
    }

    for frame in 0..buffer.frame_count() {
        for channel in 0..buffer.channel_count() {
            black_box(buffer.get_sample(SampleLocation::new(channel, frame)));
        }
    }
}

fn read_and_write_channel_by_channel() {
    let frame_count = 1024;
    let channel_count = 2;
    let sample_rate = 44_100;

    let mut buffer = OwnedAudioBuffer::new(frame_count, channel_count, sample_rate);

    for channel in 0..buffer.channel_count() {
        for frame in 0..buffer.frame_count() {
            buffer.set_sample(SampleLocation::new(channel, frame), 0.0);
        }
    }

    for channel in 0..buffer.channel_count() {
        for frame in 0..buffer.frame_count() {
            black_box(buffer.get_sample(SampleLocation::new(channel, frame)));
        }
    }
}

fn add_from() {
    let frame_count = 50_000;
    let channel_count = 2;
    let sample_rate = 44_100;

    let mut destination = OwnedAudioBuffer::new(frame_count, channel_count, sample_rate);
    let source = OwnedAudioBuffer::white_noise(frame_count, channel_count, sample_rate);

    destination.add_from(
        &source,
        SampleLocation::origin(),
        SampleLocation::origin(),
        channel_count,
        frame_count,
    );

    black_box(destination);
}

fn interleave_round_trip(buffer: &mut OwnedAudioBuffer, interleaved: &mut [f32]) {
    let channel_count = buffer.channel_count();
    interleave(buffer, interleaved, channel_count);
    deinterleave(interleaved, channel_count, buffer);
    black_box(interleaved);
}

fn audio_buffer_benchmarks(c: &mut Criterion) {
    c.benchmark_group("Audio Buffer");

    c.bench_function("read and write frame by frame", |b| {
        b.iter(read_and_write_frame_by_frame)
    });

    c.bench_function("read and write channel by channel", |b| {
        b.iter(read_and_write_channel_by_channel)
    });

    c.bench_function("add from", |b| b.iter(add_from));

    c.bench_function("interleave and deinterleave", |b| {
        let mut buffer = OwnedAudioBuffer::white_noise(4_096, 2, 44_100);
        let mut interleaved = vec![0.0; 4_096 * 2];

        b.iter(|| interleave_round_trip(&mut buffer, &mut interleaved));
    });
}

criterion_group!(benches, audio_buffer_benchmarks);

criterion_main!(benches);
