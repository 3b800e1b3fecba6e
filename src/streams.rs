// SPDX-License-Identifier: Apache-2.0

pub mod void;

use std::{io, result};
use amplify_derive::Display;
use bytemuck::{bytes_of, bytes_of_mut, Pod, Zeroable};
use num_traits::PrimInt;
use crate::{error, Buffer, ByteString, SIZE};
use crate::buffered_wrappers::BufferedSource;
use crate::byte_str::Utf8Error;
use crate::pool::Pool;
use crate::streams::ErrorKind::{Closed, Eos, Io, Utf8, Other};

pub type Error = error::Error<OperationKind, ErrorKind>;
pub type Result<T = ()> = result::Result<T, Error>;

#[derive(Copy, Clone, Debug, Default, Display)]
pub enum OperationKind {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("fill buffer")]
	Fill,
	#[display("drain buffer")]
	Drain,
	#[display("read from source")]
	Read,
	#[display("skip bytes")]
	Skip,
	#[display("find byte")]
	Find,
	#[display("flush sink")]
	Flush,
	#[display("close stream")]
	Close,
	#[display("{0}")]
	Other(&'static str)
}

impl error::OperationKind for OperationKind {
	fn unknown() -> Self { Self::Unknown }
}

#[derive(Copy, Clone, Debug, Display)]
pub enum ErrorKind {
	#[display("premature end-of-stream")]
	Eos,
	#[display("IO error")]
	Io,
	#[display("stream closed")]
	Closed,
	#[display("invalid UTF-8")]
	Utf8,
	#[display("{0}")]
	Other(&'static str),
}

impl error::ErrorKind for ErrorKind {
	fn other(message: &'static str) -> Self { Other(message) }
}

impl From<io::Error> for Error {
	fn from(value: io::Error) -> Self {
		if let io::ErrorKind::UnexpectedEof = value.kind() {
			Self::eos(OperationKind::Unknown)
		} else {
			Self::io(OperationKind::Unknown, value)
		}
	}
}

impl From<Error> for io::Error {
	fn from(value: Error) -> Self {
		match value.kind() {
			Io => match value.into_source().map(|source| source.downcast::<io::Error>()) {
				Some(Ok(io)) => *io,
				Some(Err(source)) => Self::new(io::ErrorKind::Other, source),
				None => io::ErrorKind::Other.into(),
			},
			Eos => Self::new(io::ErrorKind::UnexpectedEof, value),
			_ => Self::new(io::ErrorKind::Other, value),
		}
	}
}

impl Error {
	/// Creates a new "end-of-stream" error.
	pub fn eos(op: OperationKind) -> Self { Self::new(op, Eos, None) }

	/// Creates a new IO error.
	pub fn io(op: OperationKind, error: io::Error) -> Self {
		Self::new(op, Io, Some(error.into()))
	}

	/// Creates a new "closed" error.
	pub fn closed(op: OperationKind) -> Self {
		Self::new(op, Closed, None)
	}

	/// Creates a new UTF-8 decode error.
	pub fn utf8(op: OperationKind, error: Utf8Error) -> Self {
		Self::new(op, Utf8, Some(error.into()))
	}

	/// Returns `true` for an end-of-stream error.
	pub fn is_eos(&self) -> bool { matches!(self.kind, Eos) }

	/// Returns `true` for a closed-stream error.
	pub fn is_closed(&self) -> bool { matches!(self.kind, Closed) }
}

/// A data stream, either [`Source`] or [`Sink`].
pub trait Stream<const N: usize = SIZE> {
	/// Returns `true` if the stream is closed.
	fn is_closed(&self) -> bool;

	/// Closes the stream. Closing is idempotent; closing an already-closed
	/// stream has no effect.
	fn close(&mut self) -> Result { Ok(()) }
}

/// A data source.
pub trait Source<const N: usize = SIZE>: Stream<N> {
	/// Reads up to `count` bytes into `sink`, returning the number read.
	/// Returning `Ok(0)` for a nonzero `count` signals end of stream.
	fn fill(&mut self, sink: &mut Buffer<N, impl Pool<N>>, count: usize) -> Result<usize>;

	/// Reads bytes into `sink` until the source is exhausted, returning the
	/// number read.
	fn fill_all(&mut self, sink: &mut Buffer<N, impl Pool<N>>) -> Result<usize> {
		let mut count = 0;
		loop {
			match self.fill(sink, N)? {
				0 => break Ok(count),
				n => count += n,
			}
		}
	}
}

/// A data sink.
pub trait Sink<const N: usize = SIZE>: Stream<N> {
	/// Writes up to `count` bytes from `source`, consuming them and returning
	/// the number written. A sink must make progress or error; returning
	/// `Ok(0)` for a nonzero `count` on a non-empty `source` is a contract
	/// violation.
	fn drain(&mut self, source: &mut Buffer<N, impl Pool<N>>, count: usize) -> Result<usize>;

	/// Writes all bytes from `source`, consuming them.
	fn drain_all(&mut self, source: &mut Buffer<N, impl Pool<N>>) -> Result<usize> {
		let count = source.count();
		self.drain(source, count)
	}

	/// Writes buffered data through to its final target.
	fn flush(&mut self) -> Result { Ok(()) }
}

/// A stream holding an internal [`Buffer`].
pub trait BufStream<const N: usize = SIZE> {
	type Pool: Pool<N>;

	/// Borrows the internal buffer.
	fn buf(&self) -> &Buffer<N, Self::Pool>;
	/// Borrows the internal buffer mutably.
	fn buf_mut(&mut self) -> &mut Buffer<N, Self::Pool>;
}

macro_rules! int_reads {
	($($name:ident $le_name:ident $ty:ty),+ $(,)?) => {
		$(
		fn $name(&mut self) -> Result<$ty> where Self: Sized { self.read_int() }
		fn $le_name(&mut self) -> Result<$ty> where Self: Sized { self.read_int_le() }
		)+
	};
}

macro_rules! int_writes {
	($($name:ident $le_name:ident $ty:ty),+ $(,)?) => {
		$(
		fn $name(&mut self, value: $ty) -> Result where Self: Sized { self.write_int(value) }
		fn $le_name(&mut self, value: $ty) -> Result where Self: Sized { self.write_int_le(value) }
		)+
	};
}

/// A [`Source`] with buffered, byte-exact reads.
///
/// Exact-size operations ([`require`], [`skip`], the typed reads) fail with an
/// end-of-stream error when the requested bytes cannot be produced; [`request`]
/// is the recoverable form, reporting availability as a `bool`.
///
/// [`require`]: Self::require
/// [`skip`]: Self::skip
/// [`request`]: Self::request
pub trait BufSource<const N: usize = SIZE>: BufStream<N> + Source<N> {
	/// Attempts to make at least `count` bytes available in the buffer,
	/// returning whether it succeeded. Bytes already buffered are counted
	/// first; only the shortfall is pulled, one segment at a time.
	fn request(&mut self, count: usize) -> Result<bool>;

	/// Makes at least `count` bytes available in the buffer, failing with an
	/// end-of-stream error if the source is exhausted first.
	fn require(&mut self, count: usize) -> Result {
		if self.request(count)? {
			Ok(())
		} else {
			Err(Error::eos(OperationKind::Read))
		}
	}

	/// Skips exactly `count` bytes, failing with an end-of-stream error if
	/// fewer are available.
	fn skip(&mut self, count: usize) -> Result;

	/// Finds the first occurrence of `byte`, returning its position.
	fn find_byte(&mut self, byte: u8) -> Result<Option<usize>> {
		self.find_byte_in(byte, 0, usize::MAX)
	}

	/// Finds the first occurrence of `byte` in positions `[from, to)`,
	/// returning its position. No more than `to` bytes are ever buffered by
	/// the search, even when more are available.
	fn find_byte_in(&mut self, byte: u8, from: usize, to: usize) -> Result<Option<usize>>;

	/// Reads up to `buf.len()` bytes into `buf`, returning the number read.
	/// Returns `Ok(0)` only at end of stream or for an empty `buf`.
	fn read_slice(&mut self, buf: &mut [u8]) -> Result<usize>;

	/// Fills `buf` exactly, failing with an end-of-stream error if too few
	/// bytes are available.
	fn read_slice_exact(&mut self, buf: &mut [u8]) -> Result;

	/// Reads `count` bytes into a [`ByteString`].
	fn read_byte_str(&mut self, count: usize) -> Result<ByteString>;

	/// Reads `count` bytes of UTF-8 appended to `buf`, returning the appended
	/// portion. On invalid UTF-8 no bytes are consumed.
	fn read_utf8<'s>(&mut self, buf: &'s mut String, count: usize) -> Result<&'s str>;

	/// Reads everything from this source into `sink`, one segment at a time,
	/// returning the total number of bytes moved. Unflushed data held here is
	/// bounded by one segment regardless of stream length.
	fn read_all(&mut self, sink: &mut impl Sink<N>) -> Result<usize>;

	/// Reads a big-endian integer.
	fn read_int<T: PrimInt + Pod>(&mut self) -> Result<T> where Self: Sized {
		let mut value = T::zeroed();
		self.read_slice_exact(bytes_of_mut(&mut value))?;
		Ok(T::from_be(value))
	}

	/// Reads a little-endian integer.
	fn read_int_le<T: PrimInt + Pod>(&mut self) -> Result<T> where Self: Sized {
		let mut value = T::zeroed();
		self.read_slice_exact(bytes_of_mut(&mut value))?;
		Ok(T::from_le(value))
	}

	fn read_u8(&mut self) -> Result<u8> where Self: Sized { self.read_int() }
	fn read_i8(&mut self) -> Result<i8> where Self: Sized { self.read_int() }

	int_reads! {
		read_u16   read_u16_le   u16,
		read_i16   read_i16_le   i16,
		read_u32   read_u32_le   u32,
		read_i32   read_i32_le   i32,
		read_u64   read_u64_le   u64,
		read_i64   read_i64_le   i64,
		read_usize read_usize_le usize,
		read_isize read_isize_le isize,
	}
}

/// A [`Sink`] with buffered, byte-exact writes.
pub trait BufSink<const N: usize = SIZE>: BufStream<N> + Sink<N> {
	/// Writes all bytes of `value`.
	fn write_from_slice(&mut self, value: &[u8]) -> Result;

	/// Writes the UTF-8 bytes of `value`.
	fn write_utf8(&mut self, value: &str) -> Result {
		self.write_from_slice(value.as_bytes())
	}

	/// Writes a big-endian integer.
	fn write_int<T: PrimInt + Pod>(&mut self, value: T) -> Result where Self: Sized {
		let value = value.to_be();
		self.write_from_slice(bytes_of(&value))
	}

	/// Writes a little-endian integer.
	fn write_int_le<T: PrimInt + Pod>(&mut self, value: T) -> Result where Self: Sized {
		let value = value.to_le();
		self.write_from_slice(bytes_of(&value))
	}

	fn write_u8(&mut self, value: u8) -> Result where Self: Sized { self.write_int(value) }
	fn write_i8(&mut self, value: i8) -> Result where Self: Sized { self.write_int(value) }

	int_writes! {
		write_u16   write_u16_le   u16,
		write_i16   write_i16_le   i16,
		write_u32   write_u32_le   u32,
		write_i32   write_i32_le   i32,
		write_u64   write_u64_le   u64,
		write_i64   write_i64_le   i64,
		write_usize write_usize_le usize,
		write_isize write_isize_le isize,
	}
}

/// Extends sources with buffering wrappers.
pub trait SourceExt: Source<SIZE> + Sized {
	/// Wraps the source in a [`BufferedSource`] drawing segments from the
	/// default pool.
	fn buffered(self) -> BufferedSource<Self> {
		BufferedSource::new(self, Buffer::default())
	}

	/// Wraps the source in a [`BufferedSource`] drawing segments from `pool`.
	fn buffered_in<P: Pool<SIZE>>(self, pool: P) -> BufferedSource<Self, P> {
		BufferedSource::new(self, pool.into())
	}
}

impl<S: Source<SIZE>> SourceExt for S { }
