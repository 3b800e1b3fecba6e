// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::io::{Read, Write};
use crate::{Buffer, ByteStream, SIZE};
use crate::pool::Pool;
use crate::streams::{Error, Result, Sink, Source, Stream};
use crate::streams::OperationKind::{Drain, Fill, Flush};

/// A [`Source`] reading from a wrapped [`Read`]er.
pub struct ReaderSource<R: Read> {
	reader: Option<R>,
	is_eos: bool,
}

/// A [`Sink`] writing to a wrapped [`Write`]r.
pub struct WriterSink<W: Write> {
	writer: Option<W>,
	/// Allows the use of [`Write::write_vectored`] to possibly speed up
	/// writing. Most writers don't implement it; defaults to `false`.
	pub allow_vectored: bool,
}

impl<R: Read> From<R> for ReaderSource<R> {
	fn from(reader: R) -> Self {
		Self {
			reader: Some(reader),
			is_eos: false,
		}
	}
}

impl<W: Write> From<W> for WriterSink<W> {
	fn from(writer: W) -> Self {
		Self {
			writer: Some(writer),
			allow_vectored: false,
		}
	}
}

impl<R: Read> Stream<SIZE> for ReaderSource<R> {
	fn is_closed(&self) -> bool {
		self.reader.is_none()
	}

	/// Closes the underlying reader by letting it fall out of scope.
	/// Subsequent reads will fail.
	fn close(&mut self) -> Result {
		self.reader.take();
		Ok(())
	}
}

impl<R: Read> Source<SIZE> for ReaderSource<R> {
	fn fill(&mut self, sink: &mut Buffer<SIZE, impl Pool<SIZE>>, count: usize) -> Result<usize> {
		if self.is_eos {
			return Ok(0)
		}

		let reader = self.reader
						 .as_mut()
						 .ok_or_else(|| Error::closed(Fill))?;
		let filled = sink.fill_from_reader(reader, count)?;
		if filled == 0 && count > 0 {
			self.is_eos = true;
		}
		Ok(filled)
	}
}

impl<W: Write> Stream<SIZE> for WriterSink<W> {
	fn is_closed(&self) -> bool {
		self.writer.is_none()
	}

	/// Flushes and closes the underlying writer by letting it fall out of
	/// scope. Subsequent writes will fail.
	fn close(&mut self) -> Result {
		if let Some(mut writer) = self.writer.take() {
			writer.flush().map_err(|err| Error::io(Flush, err))?;
		}
		Ok(())
	}
}

impl<W: Write> Sink<SIZE> for WriterSink<W> {
	fn drain(&mut self, source: &mut Buffer<SIZE, impl Pool<SIZE>>, count: usize) -> Result<usize> {
		let allow_vectored = self.allow_vectored;
		let writer = self.writer
						 .as_mut()
						 .ok_or_else(|| Error::closed(Drain))?;
		source.drain_into_writer(writer, count, allow_vectored)
	}

	fn flush(&mut self) -> Result {
		self.writer
			.as_mut()
			.ok_or_else(|| Error::closed(Flush))?
			.flush()
			.map_err(|err| Error::io(Flush, err))
	}
}

impl<S: Source<SIZE>, P: Pool<SIZE>> Read for ByteStream<'_, S, P> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		match self.read_slice(buf) {
			Ok(Some(read)) => Ok(read),
			Ok(None) => Ok(0),
			Err(err) => Err(err.into()),
		}
	}
}
