/*!
# Apretar: Backends
*/

mod minimal;
mod recompress;
mod rewrite;

pub use minimal::MinimalRecode;
pub use recompress::RecompressOnly;
pub use rewrite::FullRewrite;

use crate::{
	ApretarError,
	EffortLevel,
	ImageBuffer,
	Settings,
};
use std::{
	fmt,
	ops::RangeInclusive,
};



/// # Compression Backend.
///
/// A backend takes one (encoded) image and returns a losslessly-equivalent
/// encoding of it that is no larger than the source, or an error. It never
/// returns both, and never returns partial output.
///
/// Implementations must be stateless; everything a trial needs is created
/// and dropped within a single call to [`Backend::encode`].
pub trait Backend: fmt::Debug + Send + Sync {
	/// # Kind.
	fn kind(&self) -> BackendKind;

	/// # Effort Range.
	///
	/// The inclusive range of supported effort levels.
	fn effort_range(&self) -> RangeInclusive<u8>;

	/// # Default Effort.
	fn default_effort(&self) -> u8;

	/// # Encode.
	///
	/// ## Errors
	///
	/// Returns an error if the source cannot be decoded, or cannot be
	/// re-encoded. Finding no savings is not an error; the source is simply
	/// returned as-is.
	fn encode(&self, src: &ImageBuffer, effort: EffortLevel, settings: Settings)
	-> Result<ImageBuffer, ApretarError>;
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Backend Kind.
pub enum BackendKind {
	/// # Full Rewrite.
	///
	/// Decode, then re-encode from scratch with `oxipng`.
	FullRewrite,

	/// # Recompress Only.
	///
	/// Re-deflate the existing compressed stream with Zopfli.
	RecompressOnly,

	/// # Minimal Recode.
	///
	/// Brute-force a small grid of filter and deflate settings.
	MinimalRecode,
}

impl fmt::Display for BackendKind {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl BackendKind {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::FullRewrite => "compress_png",
			Self::RecompressOnly => "advpng",
			Self::MinimalRecode => "mc_compress_png",
		}
	}

	#[must_use]
	/// # Backend.
	pub const fn backend(self) -> &'static dyn Backend {
		match self {
			Self::FullRewrite => &FullRewrite,
			Self::RecompressOnly => &RecompressOnly,
			Self::MinimalRecode => &MinimalRecode,
		}
	}
}
