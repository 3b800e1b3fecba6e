// SPDX-License-Identifier: Apache-2.0

use crate::Buffer;
use crate::pool::Pool;
use super::{Result, Sink, Source, Stream};

/// Returns a [`Sink`] that writes to nowhere, discarding any data written to it.
pub fn void_sink() -> VoidSink { VoidSink }

/// Returns a [`Source`] that reads from nowhere, producing no data.
pub fn void_source() -> VoidSource { VoidSource }

/// A [`Sink`] that writes to nowhere, discarding any data written to it.
#[derive(Copy, Clone, Debug, Default)]
pub struct VoidSink;

impl<const N: usize> Stream<N> for VoidSink {
	fn is_closed(&self) -> bool { false }
}

impl<const N: usize> Sink<N> for VoidSink {
	/// Discards `count` bytes from `source`.
	fn drain(&mut self, source: &mut Buffer<N, impl Pool<N>>, count: usize) -> Result<usize> {
		Ok(source.consume(count))
	}
}

/// A [`Source`] that reads from nowhere, producing no data.
#[derive(Copy, Clone, Debug, Default)]
pub struct VoidSource;

impl<const N: usize> Stream<N> for VoidSource {
	fn is_closed(&self) -> bool { false }
}

impl<const N: usize> Source<N> for VoidSource {
	/// Reads nothing, returning `0`.
	fn fill(&mut self, _sink: &mut Buffer<N, impl Pool<N>>, _count: usize) -> Result<usize> {
		Ok(0)
	}
}
