// SPDX-License-Identifier: Apache-2.0

use std::borrow::Borrow;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use simdutf8::compat::from_utf8;

/// An error decoding invalid UTF-8 bytes.
#[derive(Copy, Clone, Debug, thiserror::Error)]
#[error("invalid UTF-8 from byte {valid_up_to}")]
pub struct Utf8Error {
	valid_up_to: usize,
}

impl Utf8Error {
	/// Returns the length of the valid UTF-8 prefix.
	pub fn valid_up_to(&self) -> usize { self.valid_up_to }
}

impl From<simdutf8::compat::Utf8Error> for Utf8Error {
	fn from(value: simdutf8::compat::Utf8Error) -> Self {
		Self { valid_up_to: value.valid_up_to() }
	}
}

/// An error decoding a hex or base64 string into a [`ByteString`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	#[error("invalid hexadecimal")]
	Hex(#[from] base16ct::Error),
	#[error("invalid base64")]
	Base64(#[from] base64::DecodeError),
}

/// An owned, immutable string of bytes.
#[derive(Clone, Default, Eq, Hash, Ord, PartialOrd)]
pub struct ByteString {
	data: Vec<u8>,
}

impl ByteString {
	/// Creates an empty byte string.
	#[inline]
	pub fn new() -> Self { Self::default() }

	/// Returns the length in bytes of the byte string.
	#[inline]
	pub fn len(&self) -> usize { self.data.len() }
	/// Returns `true` if the byte string is empty.
	#[inline]
	pub fn is_empty(&self) -> bool { self.data.is_empty() }
	/// Returns `true` if the byte string is not empty.
	#[inline]
	pub fn is_not_empty(&self) -> bool { !self.is_empty() }

	/// Borrows the bytes as a slice.
	pub fn as_slice(&self) -> &[u8] { &self.data }

	/// Consumes the byte string, returning its bytes.
	pub fn into_vec(self) -> Vec<u8> { self.data }

	/// Decodes the bytes as UTF-8.
	pub fn utf8(&self) -> Result<&str, Utf8Error> {
		Ok(from_utf8(&self.data)?)
	}

	/// Decodes a hex string, upper or lowercase, into a byte string.
	pub fn from_hex(value: &str) -> Result<Self, DecodeError> {
		Ok(base16ct::mixed::decode_vec(value)?.into())
	}

	/// Decodes an unpadded, standard base64 string into a byte string.
	pub fn from_base64(value: &str) -> Result<Self, DecodeError> {
		Ok(STANDARD_NO_PAD.decode(value)?.into())
	}

	/// Decodes an unpadded, URL-safe base64 string into a byte string.
	pub fn from_base64_url(value: &str) -> Result<Self, DecodeError> {
		Ok(URL_SAFE_NO_PAD.decode(value)?.into())
	}

	/// Encodes the bytes as lowercase hex.
	pub fn hex_lower_string(&self) -> String {
		base16ct::lower::encode_string(&self.data)
	}

	/// Encodes the bytes as uppercase hex.
	pub fn hex_upper_string(&self) -> String {
		base16ct::upper::encode_string(&self.data)
	}

	/// Encodes the bytes as unpadded, standard base64.
	pub fn base64_string(&self) -> String {
		STANDARD_NO_PAD.encode(&self.data)
	}

	/// Encodes the bytes as unpadded, URL-safe base64.
	pub fn base64_url_string(&self) -> String {
		URL_SAFE_NO_PAD.encode(&self.data)
	}
}

impl Debug for ByteString {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "ByteString({})", self.hex_lower_string())
	}
}

impl Deref for ByteString {
	type Target = [u8];
	fn deref(&self) -> &[u8] { &self.data }
}

impl AsRef<[u8]> for ByteString {
	fn as_ref(&self) -> &[u8] { &self.data }
}

impl Borrow<[u8]> for ByteString {
	fn borrow(&self) -> &[u8] { &self.data }
}

impl From<Vec<u8>> for ByteString {
	fn from(data: Vec<u8>) -> Self { Self { data } }
}

impl From<&[u8]> for ByteString {
	fn from(data: &[u8]) -> Self { data.to_vec().into() }
}

impl<const N: usize> From<[u8; N]> for ByteString {
	fn from(data: [u8; N]) -> Self { data.to_vec().into() }
}

impl From<&str> for ByteString {
	fn from(data: &str) -> Self { data.as_bytes().into() }
}

impl FromIterator<u8> for ByteString {
	fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
		Vec::from_iter(iter).into()
	}
}

impl Extend<u8> for ByteString {
	fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
		self.data.extend(iter)
	}
}

impl<T: AsRef<[u8]> + ?Sized> PartialEq<T> for ByteString {
	fn eq(&self, other: &T) -> bool {
		self.data == other.as_ref()
	}
}
