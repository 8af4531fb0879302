/*!
# Apretar: Image Kind
*/

use crate::chunk::Ihdr;
use std::num::NonZeroU32;



/// # PNG Signature.
pub(crate) const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Image Kind.
///
/// This evaluates the file type from its magic bytes.
///
/// Only PNG, GIF, BMP, TIFF, and PNM can be compressed. JPEG is recognized
/// only so it can be turned away with a more helpful message.
pub enum ImageKind {
	/// # Bitmap.
	Bmp,

	/// # GIF.
	Gif,

	/// # JPEG.
	Jpeg,

	/// # PNG.
	Png,

	/// # Netpbm (PBM/PGM/PPM/PAM).
	Pnm,

	/// # TIFF.
	Tiff,
}

impl ImageKind {
	#[must_use]
	/// # Sniff.
	///
	/// Figure out the kind from the magic bytes, if possible.
	pub fn sniff(src: &[u8]) -> Option<Self> {
		if Self::is_png(src) { Some(Self::Png) }
		else if Self::is_gif(src) { Some(Self::Gif) }
		else if Self::is_jpeg(src) { Some(Self::Jpeg) }
		else if Self::is_bmp(src) { Some(Self::Bmp) }
		else if Self::is_tiff(src) { Some(Self::Tiff) }
		else if Self::is_pnm(src) { Some(Self::Pnm) }
		else { None }
	}

	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Bmp => "BMP",
			Self::Gif => "GIF",
			Self::Jpeg => "JPEG",
			Self::Png => "PNG",
			Self::Pnm => "PNM",
			Self::Tiff => "TIFF",
		}
	}

	#[must_use]
	/// # Image Crate Format.
	///
	/// Return the matching `image` format for the legacy kinds we can
	/// convert. PNG is handled natively; JPEG not at all.
	pub(crate) const fn legacy_format(self) -> Option<image::ImageFormat> {
		match self {
			Self::Bmp => Some(image::ImageFormat::Bmp),
			Self::Gif => Some(image::ImageFormat::Gif),
			Self::Pnm => Some(image::ImageFormat::Pnm),
			Self::Tiff => Some(image::ImageFormat::Tiff),
			Self::Jpeg | Self::Png => None,
		}
	}
}

impl ImageKind {
	#[inline]
	/// # Is BMP?
	pub(crate) fn is_bmp(src: &[u8]) -> bool {
		26 < src.len() && src.starts_with(b"BM")
	}

	#[inline]
	/// # Is GIF?
	pub(crate) fn is_gif(src: &[u8]) -> bool {
		12 < src.len() &&
		matches!(&src[..6], [b'G', b'I', b'F', b'8', b'7' | b'9', b'a'])
	}

	#[inline]
	/// # Is JPEG?
	pub(crate) fn is_jpeg(src: &[u8]) -> bool {
		12 < src.len() && src[..3] == [0xFF, 0xD8, 0xFF]
	}

	#[inline]
	/// # Is PNG?
	pub(crate) fn is_png(src: &[u8]) -> bool {
		8 < src.len() && src[..8] == PNG_SIGNATURE
	}

	#[inline]
	/// # Is PNM?
	///
	/// Netpbm headers are a `P` and a digit (`1..=7`) followed by whitespace.
	pub(crate) fn is_pnm(src: &[u8]) -> bool {
		3 < src.len() &&
		src[0] == b'P' &&
		matches!(src[1], b'1'..=b'7') &&
		src[2].is_ascii_whitespace()
	}

	#[inline]
	/// # Is TIFF?
	pub(crate) fn is_tiff(src: &[u8]) -> bool {
		8 < src.len() &&
		(src.starts_with(b"II*\0") || src.starts_with(b"MM\0*"))
	}
}

impl ImageKind {
	/// # GIF Dimensions.
	///
	/// The logical screen size from the header.
	pub(crate) fn gif_dimensions(raw: &[u8]) -> Option<(NonZeroU32, NonZeroU32)> {
		if ! Self::is_gif(raw) { return None; }
		let [_, _, _, _, _, _, w1, w2, h1, h2, ..] = *raw else { return None; };
		let w = NonZeroU32::new(u32::from(u16::from_le_bytes([w1, w2])))?;
		let h = NonZeroU32::new(u32::from(u16::from_le_bytes([h1, h2])))?;
		Some((w, h))
	}

	/// # PNG Dimensions.
	///
	/// Parse the leading IHDR chunk, returning its width and height if
	/// valid.
	pub(crate) fn png_dimensions(raw: &[u8]) -> Option<(NonZeroU32, NonZeroU32)> {
		let rest = raw.strip_prefix(&PNG_SIGNATURE)?;
		let (head, data) = rest.split_at_checked(8)?;
		if head != [0, 0, 0, 13, b'I', b'H', b'D', b'R'] { return None; }
		Ihdr::parse(data.get(..13)?).ok()?.dimensions()
	}
}
