// SPDX-License-Identifier: Apache-2.0

//! A segmented, memory-recycling byte-buffer IO core.
//!
//! ## How it works
//!
//! Data is written to and read from reusable chunks of memory called
//! *segments*. When a segment is fully consumed, it's returned to a *pool*; to
//! write data, segments are claimed back from this pool, so steady-state IO
//! allocates almost nothing. The default pool is process-wide, bounded, and
//! safe to use from independent buffers on independent threads.
//!
//! ### Segments
//!
//! A [`Segment`] is a fixed-size memory block with a window of valid data
//! inside it. Memory can be owned by one segment or shared between several,
//! which is how buffers move data between each other without copying: whole
//! segments move by reference, and a straddled segment is shared rather than
//! copied when large enough to be worth it. Shared memory is copy-on-write; it
//! can be read by every segment referencing it, and is copied into a private
//! block before any write.
//!
//! ### Buffers
//!
//! A [`Buffer`] is an ordered queue of segments forming one logical byte
//! sequence, with byte-exact read and write primitives layered on top. Buffers
//! never pull from any source themselves; an exact-size read of more bytes
//! than are buffered fails with an end-of-stream error.
//!
//! ### Buffered sources
//!
//! A [`BufferedSource`] pairs a buffer with a [`Source`](streams::Source),
//! pulling data on demand in segment-sized increments: `require` buffers only
//! the shortfall, `find_byte_in` pulls one segment per missed scan and never
//! reads past its limit, and `read_all` hands data to a sink one segment at a
//! time. Its [`ByteStream`] view is a classic pull stream, reporting end of
//! stream as a sentinel value. Once closed, every operation fails with a
//! distinct closed-stream error.

mod buffer;
mod buffered_wrappers;
mod byte_str;
pub mod error;
pub mod pool;
mod segment;
mod std_io;
pub mod streams;

pub use buffer::{Buffer, DefaultBuffer};
pub use buffered_wrappers::{BufferedSource, ByteStream};
pub use byte_str::{ByteString, DecodeError, Utf8Error};
pub use segment::Segment;
pub use std_io::{ReaderSource, WriterSink};

/// The segment size, in bytes.
pub const SIZE: usize = 8192;

/// The smallest straddled-segment prefix worth sharing instead of copying when
/// moving data between buffers.
pub(crate) const SHARE_THRESHOLD: usize = 1024;
