// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use std::io;
use std::io::Read;
use crate::Buffer;
use crate::pool::Pool;
use crate::streams::{BufSink, Error, Result, Sink, Source};
use crate::streams::OperationKind::Fill;

impl<const N: usize, P: Pool<N>> Sink<N> for Buffer<N, P> {
	fn drain(&mut self, source: &mut Buffer<N, impl Pool<N>>, count: usize) -> Result<usize> {
		source.fill(self, count)
	}

	fn drain_all(&mut self, source: &mut Buffer<N, impl Pool<N>>) -> Result<usize> {
		source.fill_all(self)
	}
}

impl<const N: usize, P: Pool<N>> BufSink<N> for Buffer<N, P> {
	fn write_from_slice(&mut self, value: &[u8]) -> Result {
		self.write_slice(value);
		Ok(())
	}
}

impl<const N: usize, P: Pool<N>> Buffer<N, P> {
	/// Fills the buffer with up to `count` bytes from `reader`, one segment at
	/// a time, returning the number read. A short read ends the fill early; a
	/// zero-length read signals the reader's end of stream.
	pub(crate) fn fill_from_reader(&mut self, reader: &mut impl Read, count: usize) -> Result<usize> {
		let mut filled = 0;
		while filled < count {
			let (read, space) = {
				let segment = self.writable();
				let space = min(segment.space(), count - filled);
				match reader.read(&mut segment.data_mut()[..space]) {
					Ok(read) => {
						segment.grow(read);
						(read, space)
					}
					Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
					Err(err) => {
						self.tidy();
						return Err(Error::io(Fill, err))
					}
				}
			};

			self.count += read;
			filled += read;
			if read == 0 || read < space {
				break
			}
		}
		self.tidy();
		Ok(filled)
	}
}
