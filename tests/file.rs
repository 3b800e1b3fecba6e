// SPDX-License-Identifier: Apache-2.0

use std::io::{Read, Seek, SeekFrom, Write};
use pretty_assertions::assert_eq;
use segio::{Buffer, ReaderSource, WriterSink, SIZE};
use segio::streams::{BufSource, Result, Sink, SourceExt};

#[test]
fn file_round_trip() -> Result {
	let mut file = tempfile::tempfile().unwrap();
	{
		let mut sink = WriterSink::from(&mut file);
		let mut data = Buffer::from_utf8("the quick brown fox");
		sink.drain_all(&mut data)?;
		sink.flush()?;
	}
	file.seek(SeekFrom::Start(0)).unwrap();

	let mut buffered = ReaderSource::from(file).buffered();
	let mut text = String::new();
	buffered.read_utf8(&mut text, 19)?;
	assert_eq!(text, "the quick brown fox");
	Ok(())
}

#[test]
fn reader_source_reports_eos() -> Result {
	let file = tempfile::tempfile().unwrap();
	let mut buffered = ReaderSource::from(file).buffered();
	assert!(!buffered.request(1)?);
	assert!(buffered.require(1).unwrap_err().is_eos());
	Ok(())
}

#[test]
fn read_all_into_file() -> Result {
	let mut src = tempfile::tempfile().unwrap();
	let data = vec![b'z'; 3 * SIZE + 5];
	src.write_all(&data).unwrap();
	src.seek(SeekFrom::Start(0)).unwrap();

	let mut dst = tempfile::tempfile().unwrap();
	{
		let mut sink = WriterSink::from(&mut dst);
		let mut buffered = ReaderSource::from(src).buffered();
		assert_eq!(buffered.read_all(&mut sink)?, data.len());
		sink.flush()?;
	}

	dst.seek(SeekFrom::Start(0)).unwrap();
	let mut readback = Vec::new();
	dst.read_to_end(&mut readback).unwrap();
	assert_eq!(readback, data);
	Ok(())
}
