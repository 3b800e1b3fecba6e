// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use std::io;
use std::io::{IoSlice, Write};
use itertools::Itertools;
use simdutf8::compat::from_utf8;
use crate::{Buffer, ByteString, SHARE_THRESHOLD};
use crate::pool::Pool;
use crate::streams::{BufSource, Error, Result, Sink, Source};
use crate::streams::OperationKind::{Drain, Read, Skip};

impl<const N: usize, P: Pool<N>> Source<N> for Buffer<N, P> {
	fn fill(&mut self, sink: &mut Buffer<N, impl Pool<N>>, count: usize) -> Result<usize> {
		let count = min(count, self.count);
		if count == 0 {
			return Ok(0)
		}

		// Use the faster fill_all.
		if count == self.count {
			return self.fill_all(sink)
		}

		// Whole segments move by reference.
		let mut moved = 0;
		while let Some(front) = self.data.front() {
			let len = front.len();
			if moved + len > count {
				break
			}

			let segment = self.data.pop_front().expect("the front segment exists");
			sink.data.push_back(segment);
			sink.count += len;
			moved += len;
		}
		self.count -= moved;

		// A straddled segment is split: its prefix is shared when large enough
		// to be worth a shared block, copied otherwise.
		let remaining = count - moved;
		if remaining > 0 {
			let front = self.data.front_mut().expect("a straddled segment remains");
			if remaining >= SHARE_THRESHOLD {
				let shared = front.share(remaining);
				sink.data.push_back(shared);
				sink.count += remaining;
			} else {
				sink.write_slice(&front.data()[..remaining]);
			}
			front.consume(remaining);
			self.count -= remaining;
		}

		Ok(count)
	}

	fn fill_all(&mut self, sink: &mut Buffer<N, impl Pool<N>>) -> Result<usize> {
		let count = self.count;
		if count == 0 {
			return Ok(0)
		}

		// Move the whole segment queue instead of draining one by one.
		sink.count += count;
		sink.data.extend(self.data.drain(..));
		self.count = 0;
		Ok(count)
	}
}

impl<const N: usize, P: Pool<N>> BufSource<N> for Buffer<N, P> {
	fn request(&mut self, count: usize) -> Result<bool> {
		Ok(self.count >= count)
	}

	fn skip(&mut self, count: usize) -> Result {
		if count > self.count {
			return Err(Error::eos(Skip))
		}

		self.consume(count);
		Ok(())
	}

	fn find_byte_in(&mut self, byte: u8, from: usize, to: usize) -> Result<Option<usize>> {
		Ok(self.scan_for(byte, from, to))
	}

	fn read_slice(&mut self, buf: &mut [u8]) -> Result<usize> {
		let mut read = 0;
		while read < buf.len() {
			let Some(front) = self.data.front_mut() else { break };
			read += front.pop_into_slice(&mut buf[read..]);
			if front.is_empty() {
				let segment = self.data.pop_front().expect("the front segment exists");
				self.pool.collect_one(segment);
			} else {
				break
			}
		}
		self.count -= read;
		Ok(read)
	}

	fn read_slice_exact(&mut self, buf: &mut [u8]) -> Result {
		self.require(buf.len())?;
		let read = self.read_slice(buf)?;
		debug_assert_eq!(read, buf.len());
		Ok(())
	}

	fn read_byte_str(&mut self, count: usize) -> Result<ByteString> {
		self.require(count)?;
		let mut data = Vec::with_capacity(count);
		for slice in self.iter_slices_in(0..count) {
			data.extend_from_slice(slice);
		}
		self.consume(count);
		Ok(data.into())
	}

	fn read_utf8<'s>(&mut self, buf: &'s mut String, count: usize) -> Result<&'s str> {
		self.require(count)?;
		let start = buf.len();
		let mut bytes = Vec::with_capacity(count);
		for slice in self.iter_slices_in(0..count) {
			bytes.extend_from_slice(slice);
		}

		// Validate before consuming; invalid data stays in the buffer.
		let str = from_utf8(&bytes).map_err(|err| Error::utf8(Read, err.into()))?;
		buf.push_str(str);
		self.consume(count);
		Ok(&buf[start..])
	}

	fn read_all(&mut self, sink: &mut impl Sink<N>) -> Result<usize> {
		let mut read = 0;
		while self.is_not_empty() {
			let drained = sink.drain(self, self.count)?;
			if drained == 0 {
				break
			}
			read += drained;
		}
		Ok(read)
	}
}

impl<const N: usize, P: Pool<N>> Buffer<N, P> {
	/// Reads all bytes as UTF-8 appended to `buf`, returning the appended
	/// portion. On invalid UTF-8 no bytes are consumed.
	pub fn read_utf8_to_end<'s>(&mut self, buf: &'s mut String) -> Result<&'s str> {
		let count = self.count;
		self.read_utf8(buf, count)
	}

	pub(crate) fn drain_into_writer(
		&mut self,
		writer: &mut impl Write,
		count: usize,
		allow_vectored: bool,
	) -> Result<usize> {
		let mut remaining = min(count, self.count);
		let mut drained = 0;
		while remaining > 0 {
			let result = {
				let slices = self.iter_slices_in(0..remaining)
								 .map(IoSlice::new)
								 .collect_vec();
				if allow_vectored {
					writer.write_vectored(&slices)
				} else {
					writer.write(&slices[0])
				}
			};
			let written = match result {
				Ok(0) => return Err(Error::io(Drain, io::ErrorKind::WriteZero.into())),
				Ok(written) => written,
				Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
				Err(err) => return Err(Error::io(Drain, err)),
			};
			self.consume(written);
			remaining -= written;
			drained += written;
		}
		Ok(drained)
	}
}
