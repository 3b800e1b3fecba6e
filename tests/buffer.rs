// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;
use paste::paste;
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;
use segio::{Buffer, Segment, SIZE};
use segio::pool::Pool;
use segio::streams::{BufSink, BufSource, Source};

#[derive(Default)]
struct InnerMockPool {
	claimed: usize,
	collected: usize,
}

#[derive(Clone, Default)]
struct MockPool {
	inner: Rc<RefCell<InnerMockPool>>,
}

impl Pool for MockPool {
	fn get() -> Self { unimplemented!() }

	fn claim_one(&self) -> Segment {
		self.inner.borrow_mut().claimed += 1;
		Segment::default()
	}

	fn collect_one(&self, _: Segment) {
		self.inner.borrow_mut().collected += 1;
	}

	fn shed(&self) { }
}

#[quickcheck]
fn count(data: Vec<u8>) {
	let buffer = Buffer::from_slice(&data);
	assert_eq!(buffer.count(), data.len());
}

#[quickcheck]
fn clear_returns_segments(data: Vec<u8>) {
	let pool = MockPool::default();
	{
		let mut buffer = Buffer::from(pool.clone());
		buffer.write_from_slice(&data).unwrap();
		buffer.clear();
	}
	let inner = pool.inner.borrow();
	assert_eq!(inner.claimed, inner.collected);
}

#[quickcheck]
fn read_recycles_segments(data: Vec<u8>) {
	let pool = MockPool::default();
	let mut buffer = Buffer::from(pool.clone());
	buffer.write_from_slice(&data).unwrap();

	let mut readback = vec![0; data.len()];
	buffer.read_slice_exact(&mut readback).unwrap();
	assert_eq!(readback, data);

	let inner = pool.inner.borrow();
	assert_eq!(inner.claimed, inner.collected);
}

#[quickcheck]
fn slice_round_trip(data: Vec<u8>) {
	let mut buffer = Buffer::from_slice(&data);
	let mut readback = vec![0; data.len()];
	buffer.read_slice_exact(&mut readback).unwrap();
	assert_eq!(readback, data);
	assert!(buffer.is_empty());
}

#[quickcheck]
fn utf8_round_trip(text: String) {
	let mut buffer = Buffer::from_utf8(&text);
	let mut readback = String::new();
	assert_eq!(buffer.read_utf8_to_end(&mut readback).unwrap(), text);
}

#[quickcheck]
fn byte_str_round_trip(data: Vec<u8>) {
	let mut buffer = Buffer::from_slice(&data);
	let str = buffer.read_byte_str(data.len()).unwrap();
	assert_eq!(str, data);
	assert!(buffer.is_empty());
}

macro_rules! int_round_trips {
	($($ty:ident),+ $(,)?) => {
		paste! {
			$(
			#[quickcheck]
			fn [<$ty _round_trip>](value: $ty) {
				let mut buffer = Buffer::from_int(value);
				assert_eq!(buffer.[<read_ $ty>]().unwrap(), value);

				let mut buffer = Buffer::from_int_le(value);
				assert_eq!(buffer.[<read_ $ty _le>]().unwrap(), value);
			}
			)+
		}
	};
}

int_round_trips! { u16, i16, u32, i32, u64, i64, usize, isize }

#[quickcheck]
fn u8_round_trip(value: u8) {
	let mut buffer = Buffer::from_int(value);
	assert_eq!(buffer.read_u8().unwrap(), value);
}

#[test]
fn round_trip_across_boundaries() {
	for len in [0, 1, SIZE - 1, SIZE, SIZE + 1, SIZE * 3 + 17] {
		let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
		let mut buffer = Buffer::from_slice(&data);
		assert_eq!(buffer.count(), len);

		let mut readback = vec![0; len];
		buffer.read_slice_exact(&mut readback).unwrap();
		assert_eq!(readback, data);
		assert!(buffer.is_empty());
	}
}

#[test]
fn int_read_straddles_segments() {
	let mut buffer = Buffer::from_slice(&vec![b'x'; SIZE - 2]);
	buffer.write_u32(0xdead_beef).unwrap();

	buffer.skip(SIZE - 2).unwrap();
	assert_eq!(buffer.read_u32().unwrap(), 0xdead_beef);
}

#[test]
fn reads_fail_at_end_of_data() {
	let mut buffer = Buffer::from_slice(b"abc");
	assert!(buffer.read_u32().unwrap_err().is_eos());
	assert!(buffer.skip(4).unwrap_err().is_eos());
	// Failed exact reads consume nothing.
	assert_eq!(buffer.count(), 3);

	buffer.skip(3).unwrap();
	assert!(buffer.is_empty());
	assert!(buffer.read_u8().unwrap_err().is_eos());
}

#[test]
fn find_byte_is_bounded() {
	let mut buffer = Buffer::from_slice(&vec![b'a'; SIZE]);
	buffer.write_utf8("xyz").unwrap();

	assert_eq!(buffer.find_byte(b'y').unwrap(), Some(SIZE + 1));
	assert_eq!(buffer.find_byte_in(b'y', 0, SIZE).unwrap(), None);
	assert_eq!(buffer.find_byte_in(b'a', 2, SIZE).unwrap(), Some(2));
	assert_eq!(buffer.find_byte(b'q').unwrap(), None);
}

#[test]
fn fill_moves_whole_segments() {
	let mut source = Buffer::from_slice(&vec![b'a'; SIZE * 2]);
	let mut sink = <Buffer>::default();

	assert_eq!(source.fill(&mut sink, SIZE).unwrap(), SIZE);
	assert_eq!(source.count(), SIZE);
	assert_eq!(sink.count(), SIZE);
}

#[test]
fn straddled_fill_splits_the_segment() {
	let mut source = Buffer::from_slice(&vec![b'a'; SIZE]);
	let mut sink = <Buffer>::default();

	assert_eq!(source.fill(&mut sink, 2048).unwrap(), 2048);
	assert_eq!(source.count(), SIZE - 2048);
	assert_eq!(sink.count(), 2048);

	// Both halves stay intact.
	let mut readback = vec![0; 2048];
	sink.read_slice_exact(&mut readback).unwrap();
	assert_eq!(readback, vec![b'a'; 2048]);
	assert_eq!(source, vec![b'a'; SIZE - 2048]);
}

#[test]
fn consume_is_lenient() {
	let mut buffer = Buffer::from_slice(b"abcdef");
	assert_eq!(buffer.consume(4), 4);
	assert_eq!(buffer.consume(100), 2);
	assert_eq!(buffer.consume(1), 0);
}

#[test]
fn get_and_index() {
	let mut buffer = Buffer::from_slice(&vec![b'a'; SIZE]);
	buffer.write_utf8("bc").unwrap();

	assert_eq!(buffer.get(0), Some(&b'a'));
	assert_eq!(buffer.get(SIZE), Some(&b'b'));
	assert_eq!(buffer[SIZE + 1], b'c');
	assert_eq!(buffer.get(SIZE + 2), None);
}

#[test]
fn eq_ignores_segmentation() {
	let mut source = Buffer::from_slice(&vec![b'z'; SIZE]);
	let mut split = <Buffer>::default();
	// A shared prefix segment, then an append that must land in a fresh
	// segment, giving a layout a straight write never produces.
	source.fill(&mut split, 2048).unwrap();
	split.write_from_slice(&vec![b'z'; 100]).unwrap();

	let whole = Buffer::from_slice(&vec![b'z'; 2148]);
	assert_eq!(split, whole);
	assert_eq!(whole, split);
	assert_eq!(split, vec![b'z'; 2148]);
}
