/*!
# Apretar: Test Images

Synthetic sources for the unit tests. PNGs are built by hand (unfiltered,
stored deflate) so they start out big and easy to improve upon; everything
else goes through the `image` crate.
*/

use crate::{
	chunk::{
		Ihdr,
		PngParts,
		write_chunk,
	},
	deflate::{
		Strategy,
		zlib_compress,
		zlib_inflate,
	},
	kind::PNG_SIGNATURE,
	raster::{
		FilterChoice,
		Raster,
		RowFilter,
	},
};
use image::{
	DynamicImage,
	ImageFormat,
	RgbImage,
};
use std::io::Cursor;



/// # RGB Gradient Pixels.
///
/// Packed 8-bit RGB, row by row.
pub(crate) fn rgb_pixels(width: u32, height: u32) -> Vec<u8> {
	let mut out = Vec::with_capacity(width as usize * height as usize * 3);
	for y in 0..height {
		for x in 0..width {
			out.push(u8::try_from(x * 255 / width).unwrap_or(u8::MAX));
			out.push(u8::try_from(y * 255 / height).unwrap_or(u8::MAX));
			out.push(u8::try_from((x + y) % 64 + 96).unwrap_or(u8::MAX));
		}
	}
	out
}

/// # RGB PNG.
///
/// An 8-bit RGB gradient consisting of exactly a signature, IHDR, one IDAT,
/// and IEND.
pub(crate) fn rgb_png(width: u32, height: u32, interlaced: bool) -> Vec<u8> {
	png(width, height, 8, 2, interlaced)
}

/// # Arbitrary PNG.
///
/// Build a PNG of any valid depth/type. RGB images get the usual gradient;
/// everything else gets a deterministic noisy pattern. Palette images get
/// a 256-entry grayscale `PLTE`.
pub(crate) fn png(width: u32, height: u32, bit_depth: u8, color_type: u8, interlaced: bool)
-> Vec<u8> {
	let ihdr = Ihdr { width, height, bit_depth, color_type, interlaced: false };
	let pixels =
		if bit_depth == 8 && color_type == 2 { rgb_pixels(width, height) }
		else {
			let row_len = ihdr.row_bytes(width as usize);
			(0..row_len * height as usize)
				.map(|i| {
					let (y, x) = (i / row_len, i % row_len);
					u8::try_from((x * 29 + y * 7 + (x & y)) % 251).unwrap_or(0)
				})
				.collect()
		};

	let raster = Raster::from_parts(ihdr, pixels);
	let scanlines = raster.filtered(FilterChoice::Fixed(RowFilter::None), interlaced);
	png_from_scanlines(ihdr.with_interlaced(interlaced), &scanlines)
}

/// # PNG From Scanlines.
///
/// Wrap already-filtered scanlines up as a PNG, stored (level zero).
pub(crate) fn png_from_scanlines(ihdr: Ihdr, scanlines: &[u8]) -> Vec<u8> {
	png_with_chunks(ihdr, scanlines, &[], &[])
}

/// # PNG With Extra Chunks.
///
/// Same as [`png_from_scanlines`], but with additional ancillary chunks
/// before and after the image data.
pub(crate) fn png_with_chunks(
	ihdr: Ihdr,
	scanlines: &[u8],
	head: &[([u8; 4], &[u8])],
	tail: &[([u8; 4], &[u8])],
) -> Vec<u8> {
	let Ok(idat) = zlib_compress(scanlines, 0, Strategy::Default) else {
		panic!("Stored deflate failed.");
	};

	let mut out = PNG_SIGNATURE.to_vec();
	write_chunk(&mut out, *b"IHDR", &ihdr.to_bytes());
	if ihdr.color_type == 3 {
		let plte: Vec<u8> = (0..=255_u8).flat_map(|v| [v, v, v]).collect();
		write_chunk(&mut out, *b"PLTE", &plte);
	}
	for (kind, data) in head { write_chunk(&mut out, *kind, data); }
	write_chunk(&mut out, *b"IDAT", &idat);
	for (kind, data) in tail { write_chunk(&mut out, *kind, data); }
	write_chunk(&mut out, *b"IEND", &[]);
	out
}

/// # Legacy Image.
///
/// Encode the RGB gradient in some other format with the `image` crate.
pub(crate) fn legacy(fmt: ImageFormat, width: u32, height: u32) -> Vec<u8> {
	let Some(img) = RgbImage::from_raw(width, height, rgb_pixels(width, height)) else {
		panic!("Bad gradient dimensions.");
	};
	let img =
		if fmt == ImageFormat::Gif { DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(img).to_rgba8()) }
		else { DynamicImage::ImageRgb8(img) };

	let mut out = Cursor::new(Vec::new());
	if let Err(e) = img.write_to(&mut out, fmt) {
		panic!("Unable to encode {fmt:?}: {e}");
	}
	out.into_inner()
}

/// # Pixels.
///
/// Decode anything the `image` crate understands to RGBA16 for
/// apples-to-apples comparisons across color types and depths.
pub(crate) fn pixels(src: &[u8]) -> (u32, u32, Vec<u16>) {
	match image::load_from_memory(src) {
		Ok(img) => {
			let img = img.to_rgba16();
			(img.width(), img.height(), img.into_raw())
		},
		Err(e) => panic!("Unable to decode image: {e}"),
	}
}

/// # Inflated IDAT.
pub(crate) fn idat_payload(src: &[u8]) -> Vec<u8> {
	let Ok(parts) = PngParts::parse(src) else { panic!("Unable to parse PNG."); };
	let Ok(payload) = zlib_inflate(&parts.idat) else { panic!("Unable to inflate IDAT."); };
	payload
}
