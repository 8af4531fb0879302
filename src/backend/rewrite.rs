/*!
# Apretar: Full Rewrite
*/

use crate::{
	ApretarError,
	Backend,
	BackendKind,
	EffortLevel,
	ImageBuffer,
	ImageKind,
	Settings,
	chunk::PngParts,
	deflate::{
		Deflater,
		Wrapper,
		zlib_inflate,
	},
	raster::Raster,
};
use image::{
	AnimationDecoder,
	codecs::gif::GifDecoder,
	ImageFormat,
	ImageReader,
};
use oxipng::{
	Options as OxipngOptions,
	StripChunks,
};
use std::{
	borrow::Cow,
	io::Cursor,
	num::NonZeroU32,
	ops::RangeInclusive,
};



/// # Highest `oxipng` Preset.
const MAX_PRESET: u8 = 6;

/// # Zopfli Iterations (Final Pass).
const ZOPFLI_ITERATIONS: u8 = 15;



#[derive(Debug, Clone, Copy, Default)]
/// # Full Rewrite.
///
/// Decode the source and re-encode it from scratch, searching color types,
/// bit depths, filters, and deflate settings with `oxipng`. Effort `n` runs
/// `oxipng` presets `0..=n`, keeping the smallest, with effort `7` adding a
/// final Zopfli pass over the winning image data.
///
/// PNG sources are accepted as-are; single-frame GIF, BMP, TIFF, and PNM
/// sources are first converted to PNG.
pub struct FullRewrite;

impl Backend for FullRewrite {
	#[inline]
	fn kind(&self) -> BackendKind { BackendKind::FullRewrite }

	#[inline]
	fn effort_range(&self) -> RangeInclusive<u8> { 0..=MAX_PRESET + 1 }

	#[inline]
	fn default_effort(&self) -> u8 { 2 }

	fn encode(&self, src: &ImageBuffer, effort: EffortLevel, settings: Settings)
	-> Result<ImageBuffer, ApretarError> {
		// Get it into PNG form first.
		let base: Cow<[u8]> = match src.kind() {
			Some(ImageKind::Png) => {
				check_png(src, settings)?;
				Cow::Borrowed(src.as_ref())
			},
			Some(ImageKind::Jpeg) => return Err(ApretarError::decode("JPEG sources are not supported")),
			Some(kind) => match kind.legacy_format() {
				Some(fmt) => Cow::Owned(convert_legacy(src, fmt, settings)?),
				None => return Err(ApretarError::decode("unsupported image format")),
			},
			None => return Err(ApretarError::decode("unrecognized image format")),
		};

		// Presets aren't strictly better than the ones before them, so try
		// them all up to the effort.
		let mut best: Option<Vec<u8>> = None;
		for preset in 0..=effort.get().min(MAX_PRESET) {
			let new = encode_oxipng(&base, preset, settings)?;
			log::trace!("oxipng preset {preset}: {} bytes.", new.len());
			if best.as_ref().is_none_or(|b| new.len() < b.len()) { best = Some(new); }
		}
		let mut best = best.ok_or_else(|| ApretarError::encode("no presets ran"))?;

		if MAX_PRESET < effort.get() && let Some(new) = encode_zopfli(&best)? {
			log::trace!("Zopfli pass: {} -> {} bytes.", best.len(), new.len());
			if new.len() < best.len() { best = new; }
		}

		if best.len() < base.len() { Ok(ImageBuffer::from(best)) }
		else {
			match base {
				Cow::Borrowed(_) => Ok(src.clone()),
				Cow::Owned(v) => Ok(ImageBuffer::from(v)),
			}
		}
	}
}



/// # Check PNG.
///
/// Make sure the PNG is within the resolution limits and decodes cleanly.
fn check_png(src: &[u8], settings: Settings) -> Result<(), ApretarError> {
	let (w, h) = ImageKind::png_dimensions(src)
		.ok_or_else(|| ApretarError::decode("missing or invalid IHDR"))?;
	if ! settings.check_resolution(w, h) {
		return Err(ApretarError::decode(format_args!("image is too big ({w}x{h})")));
	}

	Raster::decode(src).map(|_| ()).map_err(ApretarError::decode)
}

/// # Convert Legacy Image.
///
/// Decode a GIF/BMP/TIFF/PNM with the `image` crate and write it back out,
/// naively, as a PNG.
fn convert_legacy(src: &[u8], fmt: ImageFormat, settings: Settings)
-> Result<Vec<u8>, ApretarError> {
	// The image crate's animation-handling isn't robust enough for our
	// purposes, so let's count up the frames and bail if there's more
	// than one.
	if fmt == ImageFormat::Gif {
		if
			let Some((w, h)) = ImageKind::gif_dimensions(src) &&
			! settings.check_resolution(w, h)
		{
			return Err(ApretarError::decode(format_args!("image is too big ({w}x{h})")));
		}

		let frames = GifDecoder::new(Cursor::new(src))
			.map_err(ApretarError::decode)?
			.into_frames()
			.take(2)
			.count();
		if frames != 1 {
			return Err(ApretarError::decode("animated GIFs are not supported"));
		}
	}

	let img = ImageReader::with_format(Cursor::new(src), fmt)
		.decode()
		.map_err(ApretarError::decode)?;

	let (Some(w), Some(h)) = (NonZeroU32::new(img.width()), NonZeroU32::new(img.height())) else {
		return Err(ApretarError::decode("image has no pixels"));
	};
	if ! settings.check_resolution(w, h) {
		return Err(ApretarError::decode(format_args!("image is too big ({w}x{h})")));
	}

	let mut out = Cursor::new(Vec::with_capacity(src.len()));
	img.write_to(&mut out, ImageFormat::Png).map_err(ApretarError::encode)?;
	let out = out.into_inner();

	if ImageKind::is_png(&out) { Ok(out) }
	else { Err(ApretarError::encode("PNG conversion produced no output")) }
}

/// # Encode w/ `oxipng`.
fn encode_oxipng(src: &[u8], preset: u8, settings: Settings)
-> Result<Vec<u8>, ApretarError> {
	let mut opts = OxipngOptions::from_preset(preset);
	opts.fix_errors = false;
	opts.strip =
		if settings.preserve_meta() { StripChunks::None }
		else { StripChunks::Safe };

	oxipng::optimize_from_memory(src, &opts).map_err(ApretarError::encode)
}

/// # Encode w/ Zopfli.
///
/// Re-deflate the image data with Zopfli, leaving everything else as-is.
/// Returns `None` if there are no savings.
fn encode_zopfli(src: &[u8]) -> Result<Option<Vec<u8>>, ApretarError> {
	let parts = PngParts::parse(src).map_err(ApretarError::encode)?;
	let payload = zlib_inflate(&parts.idat).map_err(ApretarError::encode)?;
	let idat = Deflater::Zopfli(ZOPFLI_ITERATIONS)
		.compress(&payload, Wrapper::Zlib)
		.map_err(ApretarError::encode)?;

	if idat.len() < parts.idat.len() { Ok(Some(parts.assemble(parts.ihdr, &idat))) }
	else { Ok(None) }
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		ErrorKind,
		testing,
	};

	/// # Encode.
	fn encode(src: &[u8], effort: u8) -> Result<ImageBuffer, ApretarError> {
		let Ok(effort) = EffortLevel::new(BackendKind::FullRewrite, Some(effort)) else {
			panic!("Bad effort.");
		};
		FullRewrite.encode(&ImageBuffer::from(src), effort, Settings::new())
	}

	#[test]
	fn t_png() {
		let src = testing::rgb_png(32, 24, false);
		let expected = testing::pixels(&src);
		let mut last = usize::MAX;
		for effort in [0, 6, 7] {
			let Ok(out) = encode(&src, effort) else { panic!("Effort {effort} failed."); };
			assert!(out.len() < src.len(), "No savings at {effort}.");
			assert!(out.len() <= last, "Effort {effort} regressed.");
			assert_eq!(testing::pixels(&out), expected, "Effort {effort} is lossy.");
			last = out.len();
		}
	}

	#[test]
	fn t_efforts() {
		for (name, src) in [
			("rgb", testing::rgb_png(64, 64, false)),
			("rgba", testing::png(50, 50, 8, 6, false)),
			("p4", testing::png(60, 41, 4, 3, false)),
			("g2", testing::png(45, 37, 2, 0, false)),
		] {
			let expected = testing::pixels(&src);
			let mut sizes = Vec::new();
			for effort in 0..=MAX_PRESET + 1 {
				let Ok(out) = encode(&src, effort) else { panic!("{name} failed at {effort}."); };
				assert!(out.len() <= src.len(), "{name} grew at {effort}.");
				assert_eq!(testing::pixels(&out), expected, "{name} is lossy at {effort}.");
				sizes.push(out.len());
			}
			assert!(
				sizes.windows(2).all(|w| w[1] <= w[0]),
				"{name} sizes went up: {sizes:?}",
			);
		}
	}

	#[test]
	fn t_interlaced() {
		let src = testing::rgb_png(20, 20, true);
		let Ok(out) = encode(&src, 2) else { panic!("Interlaced PNG failed."); };
		assert!(out.len() < src.len());
		assert_eq!(testing::pixels(&out), testing::pixels(&src));
	}

	#[test]
	fn t_legacy() {
		for fmt in [ImageFormat::Bmp, ImageFormat::Gif, ImageFormat::Pnm, ImageFormat::Tiff] {
			let src = testing::legacy(fmt, 16, 12);
			let Ok(out) = encode(&src, 2) else { panic!("{fmt:?} failed."); };
			assert_eq!(out.kind(), Some(ImageKind::Png));
			assert_eq!(testing::pixels(&out), testing::pixels(&src), "{fmt:?} is lossy.");
		}
	}

	#[test]
	fn t_invalid() {
		let src = testing::rgb_png(16, 16, false);

		// Truncated.
		let err = encode(&src[..src.len() - 30], 2).err().map(|e| e.kind());
		assert_eq!(err, Some(ErrorKind::DecodeError));

		// Corrupted image data.
		let mut bad = src.clone();
		let idx = bad.len() - 30;
		bad[idx] ^= 0xFF;
		assert_eq!(encode(&bad, 2).err().map(|e| e.kind()), Some(ErrorKind::DecodeError));

		// Wrong or unknown formats.
		let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F', 0, 1, 1, 0];
		for raw in [&[][..], &b"hello world"[..], &jpeg[..]] {
			assert_eq!(encode(raw, 2).err().map(|e| e.kind()), Some(ErrorKind::DecodeError));
		}
	}

	#[test]
	fn t_max_pixels() {
		let mut settings = Settings::new();
		assert!(settings.set_max_pixels_raw(b"100").is_ok());
		let Ok(effort) = EffortLevel::new(BackendKind::FullRewrite, None) else {
			panic!("Bad effort.");
		};

		let small = ImageBuffer::from(testing::rgb_png(10, 10, false));
		assert!(FullRewrite.encode(&small, effort, settings).is_ok());

		let big = ImageBuffer::from(testing::rgb_png(11, 10, false));
		let Err(err) = FullRewrite.encode(&big, effort, settings) else {
			panic!("Pixel limit ignored.");
		};
		assert_eq!(err.kind(), ErrorKind::DecodeError);
		assert!(err.to_string().contains("too big"));

		let big = ImageBuffer::from(testing::legacy(ImageFormat::Bmp, 11, 10));
		assert!(FullRewrite.encode(&big, effort, settings).is_err());
	}

	#[test]
	fn t_strip() {
		// Comments survive by default, but not when metadata is unwanted.
		let Ok(raster) = Raster::decode(&testing::rgb_png(8, 8, false)) else {
			panic!("Unable to decode.");
		};
		let src = testing::png_with_chunks(
			raster.ihdr(),
			&raster.filtered(crate::raster::FilterChoice::MinSum, false),
			&[],
			&[(*b"tEXt", &b"Comment\0Hello there, this is a comment."[..])],
		);
		let Ok(effort) = EffortLevel::new(BackendKind::FullRewrite, Some(1)) else {
			panic!("Bad effort.");
		};

		let mut settings = Settings::new();
		let Ok(kept) = FullRewrite.encode(&ImageBuffer::from(src.as_slice()), effort, settings) else {
			panic!("Encode failed.");
		};
		assert!(kept.windows(4).any(|w| w == b"tEXt"));

		settings.set_preserve_meta(false);
		let Ok(stripped) = FullRewrite.encode(&ImageBuffer::from(src.as_slice()), effort, settings) else {
			panic!("Encode failed.");
		};
		assert!(! stripped.windows(4).any(|w| w == b"tEXt"));
		assert_eq!(testing::pixels(&stripped), testing::pixels(&src));
	}
}
