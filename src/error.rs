/*!
# Apretar: Errors
*/

use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Error Kind.
///
/// Every failure, whatever its origin, is reported as one of these.
pub enum ErrorKind {
	/// # Invalid Argument.
	///
	/// The effort level (or a setting) is out of range.
	InvalidArgument,

	/// # Decode Error.
	///
	/// The source is not a supported or intact image.
	DecodeError,

	/// # Encode Error.
	///
	/// The source decoded fine, but re-encoding it did not.
	EncodeError,

	/// # Not a Stream.
	///
	/// The source is not a parseable PNG, zlib, or gzip container.
	NotAStream,

	/// # Recompression Failed.
	///
	/// The compressor broke down. (Failing to find savings is _not_ an
	/// error.)
	RecompressionFailed,
}

impl fmt::Display for ErrorKind {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl ErrorKind {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::InvalidArgument => "invalid argument",
			Self::DecodeError => "decode error",
			Self::EncodeError => "encode error",
			Self::NotAStream => "not a compressed stream",
			Self::RecompressionFailed => "recompression failed",
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Apretar Error.
///
/// A terminal error kind, plus whatever diagnostic text the underlying
/// decoder/encoder had to say about it.
pub struct ApretarError {
	/// # Kind.
	kind: ErrorKind,

	/// # Detail.
	detail: Option<Box<str>>,
}

impl Error for ApretarError {}

impl fmt::Display for ApretarError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.detail.as_deref() {
			Some(detail) => write!(f, "{}: {detail}", self.kind),
			None => f.write_str(self.kind.as_str()),
		}
	}
}

impl From<ErrorKind> for ApretarError {
	#[inline]
	fn from(kind: ErrorKind) -> Self { Self { kind, detail: None } }
}

impl ApretarError {
	#[must_use]
	/// # New (With Detail).
	pub fn new<D: fmt::Display>(kind: ErrorKind, detail: D) -> Self {
		let detail = detail.to_string();
		Self {
			kind,
			detail: if detail.is_empty() { None } else { Some(detail.into_boxed_str()) },
		}
	}

	#[must_use]
	/// # Kind.
	pub const fn kind(&self) -> ErrorKind { self.kind }

	#[must_use]
	/// # Detail.
	///
	/// Return the diagnostic message, if any.
	pub fn detail(&self) -> Option<&str> { self.detail.as_deref() }
}

impl ApretarError {
	/// # Invalid Argument.
	pub(crate) fn invalid<D: fmt::Display>(detail: D) -> Self {
		Self::new(ErrorKind::InvalidArgument, detail)
	}

	/// # Decode Error.
	pub(crate) fn decode<D: fmt::Display>(detail: D) -> Self {
		Self::new(ErrorKind::DecodeError, detail)
	}

	/// # Encode Error.
	pub(crate) fn encode<D: fmt::Display>(detail: D) -> Self {
		Self::new(ErrorKind::EncodeError, detail)
	}

	/// # Not a Stream.
	pub(crate) fn not_a_stream<D: fmt::Display>(detail: D) -> Self {
		Self::new(ErrorKind::NotAStream, detail)
	}

	/// # Recompression Failed.
	pub(crate) fn recompression<D: fmt::Display>(detail: D) -> Self {
		Self::new(ErrorKind::RecompressionFailed, detail)
	}
}
