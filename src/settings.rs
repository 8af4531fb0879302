/*!
# Apretar: Settings
*/

use crate::ApretarError;
use dactyl::traits::BytesToUnsigned;
use std::num::NonZeroU32;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Encoding Settings.
///
/// Knobs shared by the pixel-decoding backends. The defaults impose no
/// resolution limit and keep all metadata.
pub struct Settings {
	/// # Maximum Resolution.
	///
	/// Images with more pixels than this will be rejected.
	max_pixels: Option<NonZeroU32>,

	/// # Preserve Metadata?
	///
	/// If false, `compress_png` may strip ancillary chunks that don't affect
	/// rendering.
	preserve_meta: bool,
}

impl Default for Settings {
	#[inline]
	fn default() -> Self { Self::new() }
}

impl Settings {
	#[must_use]
	/// # New Instance.
	pub const fn new() -> Self {
		Self {
			max_pixels: None,
			preserve_meta: true,
		}
	}

	/// # Set Max Resolution.
	pub const fn set_max_pixels(&mut self, max: NonZeroU32) {
		self.max_pixels = Some(max);
	}

	/// # Set Max Resolution (Raw).
	///
	/// Update the pixel limit from raw bytes, e.g. an environment variable.
	/// The value may or may not end with a `k`/`m`/`g` multiplier.
	///
	/// ## Errors
	///
	/// An error is returned if the value is invalid.
	pub fn set_max_pixels_raw(&mut self, raw: &[u8]) -> Result<(), ApretarError> {
		let multiplier: u32 =
		match raw.last() {
			Some(b'k' | b'K') => 1_000,
			Some(b'm' | b'M') => 1_000_000,
			Some(b'g' | b'G') => 1_000_000_000,
			None => return Err(ApretarError::invalid("empty pixel limit")),
			_ => 1,
		};

		let len = raw.len() - usize::from(multiplier != 1);
		self.max_pixels.replace(
			u32::btou(raw[..len].trim_ascii())
			.and_then(|n| n.checked_mul(multiplier))
			.and_then(NonZeroU32::new)
			.ok_or_else(|| ApretarError::invalid(format_args!(
				"invalid pixel limit: {}",
				String::from_utf8_lossy(raw),
			)))?
		);

		Ok(())
	}

	/// # Preserve Metadata.
	pub const fn set_preserve_meta(&mut self, preserve: bool) {
		self.preserve_meta = preserve;
	}
}

impl Settings {
	#[must_use]
	/// # Check Resolution.
	///
	/// Check that the width and height are within the limits, if any.
	pub fn check_resolution(self, width: NonZeroU32, height: NonZeroU32) -> bool {
		width.checked_mul(height)
			.is_some_and(|res| self.max_pixels.is_none_or(|max| res <= max))
	}

	#[must_use]
	/// # Max Pixels.
	pub const fn max_pixels(self) -> Option<NonZeroU32> { self.max_pixels }

	#[must_use]
	/// # Preserve Metadata?
	pub const fn preserve_meta(self) -> bool { self.preserve_meta }
}
