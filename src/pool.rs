// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use crate::{Segment, SIZE};

/// The maximum total capacity of pooled segments, in bytes. Segments collected
/// beyond this are dropped instead of retained.
pub const MAX_POOLED_BYTES: usize = 64 * 1024;

/// A pool of reusable [`Segment`]s.
///
/// Buffers claim segments from their pool to write and collect fully-consumed
/// segments back into it, amortizing allocation across buffers. Handles are
/// cheap to clone and safe to use from independent buffers on independent
/// threads; each method locks the free list only for its own duration.
pub trait Pool<const N: usize = SIZE>: Clone {
	/// Returns a handle to the process-wide default pool.
	fn get() -> Self;

	/// Claims a single segment, allocating if the pool is empty. Never blocks
	/// on anything but the free-list lock.
	fn claim_one(&self) -> Segment<N>;

	/// Claims `count` segments into `target`.
	fn claim_count(&self, target: &mut impl Extend<Segment<N>>, count: usize) {
		target.extend((0..count).map(|_| self.claim_one()))
	}

	/// Claims segments into `target` totalling at least `min_size` bytes.
	fn claim_size(&self, target: &mut impl Extend<Segment<N>>, min_size: usize) {
		self.claim_count(target, min_size.div_ceil(N))
	}

	/// Collects a segment back into the pool. Segments whose memory is still
	/// shared with another owner are dropped, never pooled; so are segments
	/// collected while the pool is at capacity. Retained segments have their
	/// window reset, but their bytes are not zeroed.
	fn collect_one(&self, segment: Segment<N>);

	/// Collects many segments back into the pool.
	fn collect(&self, segments: impl IntoIterator<Item = Segment<N>>) {
		for segment in segments {
			self.collect_one(segment)
		}
	}

	/// Clears segments from the pool to free space.
	fn shed(&self);
}

/// The default segment pool: a mutex-guarded free list bounded by
/// [`MAX_POOLED_BYTES`] of total segment capacity.
#[derive(Default)]
pub struct DefaultPool<const N: usize = SIZE> {
	segments: Mutex<Vec<Segment<N>>>,
}

impl<const N: usize> DefaultPool<N> {
	const MAX_COUNT: usize = MAX_POOLED_BYTES / N;
}

/// A cloneable handle to a [`DefaultPool`].
#[derive(Clone, Default)]
pub struct DefaultPoolContainer(Arc<DefaultPool>);

impl Pool<SIZE> for DefaultPoolContainer {
	fn get() -> Self { pool() }

	fn claim_one(&self) -> Segment {
		self.0.segments.lock().pop().unwrap_or_default()
	}

	fn collect_one(&self, mut segment: Segment) {
		if segment.is_shared() {
			return
		}

		let mut segments = self.0.segments.lock();
		if segments.len() < DefaultPool::<SIZE>::MAX_COUNT {
			segment.clear();
			segments.push(segment);
		}
	}

	fn collect(&self, iter: impl IntoIterator<Item = Segment>) {
		let mut segments = self.0.segments.lock();
		for mut segment in iter {
			if segments.len() >= DefaultPool::<SIZE>::MAX_COUNT {
				break
			}

			if segment.is_shared() {
				continue
			}

			segment.clear();
			segments.push(segment);
		}
	}

	fn shed(&self) {
		self.0.segments.lock().clear()
	}
}

impl DefaultPoolContainer {
	/// Returns the number of segments currently held by the pool.
	pub fn len(&self) -> usize { self.0.segments.lock().len() }

	/// Returns `true` if the pool holds no segments.
	pub fn is_empty(&self) -> bool { self.len() == 0 }
}

static POOL: Lazy<DefaultPoolContainer> = Lazy::new(DefaultPoolContainer::default);

/// Clones a handle to the default segment pool.
#[inline]
pub fn pool() -> DefaultPoolContainer { POOL.clone() }

#[cfg(test)]
mod test {
	use crate::SIZE;
	use crate::streams::{BufSink, BufSource};
	use super::{DefaultPool, DefaultPoolContainer, Pool};

	#[test]
	fn claim_reuses_collected() {
		let pool = DefaultPoolContainer::default();
		let mut seg = pool.claim_one();
		seg.push_slice(b"recycled");
		seg.consume(8);
		pool.collect_one(seg);
		assert_eq!(pool.len(), 1);

		let seg = pool.claim_one();
		assert!(seg.is_empty());
		assert_eq!(pool.len(), 0);
	}

	#[test]
	fn collect_drops_shared() {
		let pool = DefaultPoolContainer::default();
		let mut seg = pool.claim_one();
		seg.push_slice(b"shared");
		let _other = seg.share_all();
		pool.collect_one(seg);
		assert!(pool.is_empty());
	}

	#[test]
	fn collect_is_bounded() {
		let pool = DefaultPoolContainer::default();
		pool.collect((0..2 * DefaultPool::<SIZE>::MAX_COUNT).map(|_| Default::default()));
		assert_eq!(pool.len(), DefaultPool::<SIZE>::MAX_COUNT);
	}

	#[test]
	fn buffers_share_one_pool() {
		let pool = DefaultPoolContainer::default();
		let mut a = crate::Buffer::from(pool.clone());
		let mut b = crate::Buffer::from(pool.clone());

		a.write_from_slice(b"round trip").unwrap();
		let mut readback = [0; 10];
		a.read_slice_exact(&mut readback).unwrap();
		assert_eq!(pool.len(), 1, "a's segment should return to the pool");

		b.write_from_slice(&readback).unwrap();
		assert!(pool.is_empty(), "b should claim the recycled segment");
	}
}
