// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use segio::{Buffer, DefaultBuffer, SIZE};
use segio::streams::{BufSink, BufSource, Sink, Source};
use segio::streams::void::void_sink;

fn data() -> Vec<u8> {
	(0..SIZE * 4).map(|i| (i % 251) as u8).collect()
}

fn write_slice(c: &mut Criterion) {
	let data = data();
	c.bench_function("write_slice", |b| b.iter(|| {
		let mut buf = DefaultBuffer::default();
		buf.write_from_slice(black_box(&data)).unwrap();
		buf
	}));
}

fn read_slice(c: &mut Criterion) {
	let data = data();
	let mut target = vec![0; data.len()];
	c.bench_function("read_slice", |b| b.iter_batched_ref(
		|| Buffer::from_slice(&data),
		|buf| buf.read_slice_exact(black_box(&mut target)).unwrap(),
		BatchSize::SmallInput,
	));
}

fn fill_all(c: &mut Criterion) {
	let data = data();
	c.bench_function("fill_all", |b| b.iter_batched_ref(
		|| Buffer::from_slice(&data),
		|buf| {
			let mut sink = Buffer::default();
			buf.fill_all(&mut sink).unwrap();
			sink
		},
		BatchSize::SmallInput,
	));
}

fn drain_to_void(c: &mut Criterion) {
	let data = data();
	c.bench_function("drain_to_void", |b| b.iter_batched_ref(
		|| Buffer::from_slice(&data),
		|buf| void_sink().drain_all(buf).unwrap(),
		BatchSize::SmallInput,
	));
}

fn find_byte(c: &mut Criterion) {
	// 0xfe never occurs in the data, forcing a full scan to the sentinel.
	let mut buffer = Buffer::from_slice(&data());
	buffer.write_from_slice(&[0xfe]).unwrap();
	c.bench_function("find_byte", |b| b.iter(||
		buffer.find_byte(black_box(0xfe)).unwrap()
	));
}

criterion_group!(benches, write_slice, read_slice, fill_all, drain_to_void, find_byte);
criterion_main!(benches);
