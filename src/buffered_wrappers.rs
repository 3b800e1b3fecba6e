// SPDX-License-Identifier: Apache-2.0

use crate::{Buffer, ByteString, SIZE};
use crate::error::ResultContext;
use crate::pool::{DefaultPoolContainer, Pool};
use crate::streams::{BufSource, BufStream, Error, OperationKind, Result, Sink, Source, Stream};
use crate::streams::OperationKind::{Close, Fill, Find, Read, Skip};

/// A [`Source`] buffered through an owned [`Buffer`].
///
/// Data is pulled from the wrapped source on demand, one segment at a time:
/// no operation buffers more than one segment of new data per underlying read,
/// so arbitrarily large streams are processed with bounded working memory.
/// Bytes already buffered are always served before the source is touched.
///
/// Closing the buffered source closes the wrapped source exactly once and
/// permanently fails every subsequent operation with a closed-stream error,
/// distinct from end-of-stream. Dropping closes implicitly.
///
/// A single instance is not safe for concurrent use from multiple threads.
pub struct BufferedSource<S: Source<SIZE>, P: Pool<SIZE> = DefaultPoolContainer> {
	buffer: Buffer<SIZE, P>,
	source: S,
	closed: bool,
}

impl<S: Source<SIZE>, P: Pool<SIZE>> BufferedSource<S, P> {
	#[inline]
	pub(crate) fn new(source: S, buffer: Buffer<SIZE, P>) -> Self {
		let closed = source.is_closed();
		Self { buffer, source, closed }
	}

	pub(crate) fn check_open(&self, op: OperationKind) -> Result {
		if self.closed {
			Err(Error::closed(op))
		} else {
			Ok(())
		}
	}

	/// Borrows the wrapped source.
	pub fn source(&self) -> &S { &self.source }

	/// Returns a pull-style byte stream view over this source. The view
	/// reports end of stream as a sentinel value rather than an error, and
	/// closing it closes this source.
	pub fn byte_stream(&mut self) -> ByteStream<'_, S, P> {
		ByteStream { source: self }
	}
}

impl<S: Source<SIZE>, P: Pool<SIZE>> Stream<SIZE> for BufferedSource<S, P> {
	#[inline]
	fn is_closed(&self) -> bool { self.closed }

	fn close(&mut self) -> Result {
		if !self.closed {
			self.closed = true;
			self.buffer.clear();
			self.source.close().context(Close)
		} else {
			Ok(())
		}
	}
}

impl<S: Source<SIZE>, P: Pool<SIZE>> Source<SIZE> for BufferedSource<S, P> {
	fn fill(&mut self, sink: &mut Buffer<SIZE, impl Pool<SIZE>>, count: usize) -> Result<usize> {
		self.check_open(Fill)?;
		let mut read = self.buffer.fill(sink, count)?;
		if read < count {
			read += self.source.fill(sink, count - read)?;
		}
		Ok(read)
	}
}

impl<S: Source<SIZE>, P: Pool<SIZE>> BufStream<SIZE> for BufferedSource<S, P> {
	type Pool = P;

	fn buf(&self) -> &Buffer<SIZE, P> { &self.buffer }
	fn buf_mut(&mut self) -> &mut Buffer<SIZE, P> { &mut self.buffer }
}

impl<S: Source<SIZE>, P: Pool<SIZE>> BufSource<SIZE> for BufferedSource<S, P> {
	fn request(&mut self, count: usize) -> Result<bool> {
		self.check_open(Read)?;
		while self.buffer.count() < count {
			let Self { source, buffer, .. } = self;
			if source.fill(buffer, SIZE)? == 0 {
				break
			}
		}
		Ok(self.buffer.count() >= count)
	}

	fn skip(&mut self, mut count: usize) -> Result {
		self.check_open(Skip)?;
		loop {
			count -= self.buffer.consume(count);
			if count == 0 {
				return Ok(())
			}

			let Self { source, buffer, .. } = self;
			if source.fill(buffer, SIZE)? == 0 {
				return Err(Error::eos(Skip))
			}
		}
	}

	fn find_byte_in(&mut self, byte: u8, mut from: usize, to: usize) -> Result<Option<usize>> {
		self.check_open(Find)?;
		if from >= to {
			return Ok(None)
		}

		loop {
			if let Some(index) = self.buffer.scan_for(byte, from, to) {
				return Ok(Some(index))
			}

			let buffered = self.buffer.count();
			if buffered >= to {
				return Ok(None)
			}

			// The next scan picks up where this one left off.
			from = from.max(buffered);
			let Self { source, buffer, .. } = self;
			if source.fill(buffer, SIZE)? == 0 {
				return Ok(None)
			}
		}
	}

	fn read_slice(&mut self, buf: &mut [u8]) -> Result<usize> {
		self.check_open(Read)?;
		if buf.is_empty() || !self.request(1)? {
			return Ok(0)
		}
		self.buffer.read_slice(buf)
	}

	fn read_slice_exact(&mut self, buf: &mut [u8]) -> Result {
		self.require(buf.len())?;
		self.buffer.read_slice_exact(buf)
	}

	fn read_byte_str(&mut self, count: usize) -> Result<ByteString> {
		self.require(count)?;
		self.buffer.read_byte_str(count)
	}

	fn read_utf8<'s>(&mut self, buf: &'s mut String, count: usize) -> Result<&'s str> {
		self.require(count)?;
		self.buffer.read_utf8(buf, count)
	}

	fn read_all(&mut self, sink: &mut impl Sink<SIZE>) -> Result<usize> {
		self.check_open(Read)?;
		let mut read = 0;
		loop {
			if self.buffer.is_empty() {
				let Self { source, buffer, .. } = self;
				if source.fill(buffer, SIZE)? == 0 {
					break
				}
			}

			let count = self.buffer.count();
			let drained = sink.drain(&mut self.buffer, count)?;
			if drained == 0 {
				break
			}
			read += drained;
		}
		Ok(read)
	}
}

impl<S: Source<SIZE>, P: Pool<SIZE>> Drop for BufferedSource<S, P> {
	fn drop(&mut self) {
		let _ = self.close();
	}
}

/// A classic pull-style byte stream over a [`BufferedSource`].
///
/// Reads report end of stream as `Ok(None)`, the conventional sentinel shape,
/// while closed-stream and IO conditions are errors. [`available`] reports the
/// buffered byte count and never pulls from the source.
///
/// [`available`]: Self::available
pub struct ByteStream<'a, S: Source<SIZE>, P: Pool<SIZE>> {
	source: &'a mut BufferedSource<S, P>,
}

impl<S: Source<SIZE>, P: Pool<SIZE>> ByteStream<'_, S, P> {
	/// Reads the next byte, or `None` at end of stream.
	pub fn read_byte(&mut self) -> Result<Option<u8>> {
		if !self.source.request(1)? {
			return Ok(None)
		}
		Ok(Some(self.source.read_u8()?))
	}

	/// Reads up to `buf.len()` bytes into `buf`, returning the number read,
	/// or `None` at end of stream.
	pub fn read_slice(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
		self.source.check_open(Read)?;
		if buf.is_empty() {
			return Ok(Some(0))
		}

		let read = self.source.read_slice(buf)?;
		Ok((read > 0).then_some(read))
	}

	/// Returns the number of bytes that can be read without pulling from the
	/// underlying source.
	pub fn available(&self) -> Result<usize> {
		self.source.check_open(Read)?;
		Ok(self.source.buffer.count())
	}

	/// Closes the owning buffered source.
	pub fn close(&mut self) -> Result {
		self.source.close()
	}
}
