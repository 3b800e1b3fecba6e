// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use all_asserts::debug_assert_le;
use crate::SIZE;

/// A sharable, fixed-size block of memory. Memory is copy-on-write when shared,
/// directly mutable when fully owned, so moving data between buffers is almost
/// free: sharing clones a reference, and only a later write pays for a copy.
#[derive(Clone)]
struct Memory<const N: usize>(Arc<[u8; N]>);

impl<const N: usize> Memory<N> {
	fn empty() -> Self { Self(Arc::new([0; N])) }

	/// Returns a shared reference to the memory.
	fn share(&self) -> Self { Self(Arc::clone(&self.0)) }

	/// Returns `true` if the memory is referenced by more than one segment.
	fn is_shared(&self) -> bool { Arc::strong_count(&self.0) > 1 }

	fn data(&self) -> &[u8; N] { &self.0 }

	/// Copy-on-write accessor: shared memory is copied into a private block
	/// before the mutable borrow is returned.
	fn fork_mut(&mut self) -> &mut [u8; N] { Arc::make_mut(&mut self.0) }
}

impl<const N: usize> Default for Memory<N> {
	fn default() -> Self { Self::empty() }
}

/// A fixed-size buffer segment: a [`Memory`] block and the `[pos, limit)`
/// window of valid data within it. Bytes are read at `pos` and written at
/// `limit`. Bytes outside the window are garbage and never exposed.
///
/// Segments sharing one memory block may read it concurrently; the block is
/// never written through a shared segment without being forked first.
#[derive(Clone, Default)]
pub struct Segment<const N: usize = SIZE> {
	mem: Memory<N>,
	pos: usize,
	limit: usize,
}

impl<const N: usize> Segment<N> {
	/// Returns a new empty segment with its own memory.
	pub fn empty() -> Self { Self::default() }

	/// Returns the position of the first valid byte, in `[0, N]`.
	pub fn pos(&self) -> usize { self.pos }
	/// Returns the position one past the last valid byte, in `[pos, N]`.
	pub fn limit(&self) -> usize { self.limit }
	/// Returns the number of valid bytes.
	pub fn len(&self) -> usize { self.limit - self.pos }
	/// Returns the number of bytes that can be written to this segment.
	pub fn space(&self) -> usize { N - self.limit }

	/// Returns `true` if the segment contains no valid bytes.
	pub fn is_empty(&self) -> bool { self.pos == self.limit }
	/// Returns `true` if no more bytes can be written to the segment.
	pub fn is_full(&self) -> bool { self.limit == N }
	/// Returns `true` if the segment's memory is shared with another segment.
	pub fn is_shared(&self) -> bool { self.mem.is_shared() }

	/// Returns a slice of the valid data.
	pub fn data(&self) -> &[u8] {
		&self.mem.data()[self.pos..self.limit]
	}

	/// Returns a mutable slice of the unwritten space after `limit`. Shared
	/// memory is forked before the borrow is returned, so writing through the
	/// slice can never corrupt another segment's view of the same block.
	pub fn data_mut(&mut self) -> &mut [u8] {
		let limit = self.limit;
		&mut self.mem.fork_mut()[limit..]
	}

	/// Grows the valid window by `count` bytes written through [`data_mut`].
	///
	/// [`data_mut`]: Self::data_mut
	pub fn grow(&mut self, count: usize) {
		debug_assert_le!(count, self.space());
		self.limit += count;
	}

	/// Consumes up to `count` bytes from the front of the window, returning the
	/// number consumed.
	pub fn consume(&mut self, count: usize) -> usize {
		let count = min(count, self.len());
		self.pos += count;
		count
	}

	/// Returns a segment sharing the first `count` valid bytes of this one.
	/// No data is copied; both segments reference the same memory block.
	pub fn share(&self, count: usize) -> Self {
		debug_assert_le!(count, self.len());
		Self {
			mem: self.mem.share(),
			pos: self.pos,
			limit: self.pos + count,
		}
	}

	/// Returns a segment sharing all valid bytes of this one.
	pub fn share_all(&self) -> Self { self.share(self.len()) }

	/// Pushes one byte, returning `false` if the segment is full.
	pub fn push(&mut self, value: u8) -> bool {
		if self.is_full() {
			return false
		}

		self.data_mut()[0] = value;
		self.limit += 1;
		true
	}

	/// Pops one byte from the front of the window.
	pub fn pop(&mut self) -> Option<u8> {
		if self.is_empty() {
			return None
		}

		let value = self.data()[0];
		self.pos += 1;
		Some(value)
	}

	/// Pushes bytes from a slice, returning the number written.
	pub fn push_slice(&mut self, values: &[u8]) -> usize {
		let count = min(self.space(), values.len());
		if count > 0 {
			self.data_mut()[..count].copy_from_slice(&values[..count]);
			self.limit += count;
		}
		count
	}

	/// Pops bytes into a slice, returning the number read.
	pub fn pop_into_slice(&mut self, values: &mut [u8]) -> usize {
		let count = min(self.len(), values.len());
		if count > 0 {
			values[..count].copy_from_slice(&self.data()[..count]);
			self.pos += count;
		}
		count
	}

	/// Resets the window, discarding valid data. The backing bytes are left as
	/// garbage; pooled segments are reset but never zeroed.
	pub fn clear(&mut self) {
		self.pos = 0;
		self.limit = 0;
	}
}

impl<const N: usize> Debug for Segment<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Segment")
			.field("pos", &self.pos)
			.field("limit", &self.limit)
			.field("shared", &self.is_shared())
			.finish_non_exhaustive()
	}
}

impl<const N: usize> From<[u8; N]> for Segment<N> {
	fn from(value: [u8; N]) -> Self {
		Self {
			mem: Memory(Arc::new(value)),
			pos: 0,
			limit: N,
		}
	}
}

#[cfg(test)]
mod test {
	use super::Segment;

	#[test]
	fn share_is_zero_copy() {
		let mut seg = Segment::<64>::empty();
		assert_eq!(seg.push_slice(b"segments"), 8);

		let shared = seg.share(3);
		assert!(seg.is_shared());
		assert_eq!(shared.data(), b"seg");
		assert_eq!(seg.data(), b"segments");
	}

	#[test]
	fn write_forks_shared_memory() {
		let mut seg = Segment::<64>::empty();
		seg.push_slice(b"abc");
		let shared = seg.share_all();

		// The write lands in a forked block, not the shared one.
		assert!(seg.push(b'd'));
		assert!(!seg.is_shared());
		assert!(!shared.is_shared());
		assert_eq!(seg.data(), b"abcd");
		assert_eq!(shared.data(), b"abc");
	}

	#[test]
	fn consume_then_clear() {
		let mut seg = Segment::<64>::empty();
		seg.push_slice(b"abcdef");
		assert_eq!(seg.consume(2), 2);
		assert_eq!(seg.data(), b"cdef");
		assert_eq!(seg.pos(), 2);

		seg.clear();
		assert!(seg.is_empty());
		assert_eq!(seg.space(), 64);
	}
}
