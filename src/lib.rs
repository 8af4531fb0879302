/*!
# Apretar

Lossless, in-memory PNG recompression.

Three backends sit behind a single contract: bytes in, smaller (or
identical) bytes out.

* [`compress_png`]: a full decode/re-encode in the spirit of `optipng`,
  accepting PNG, GIF, BMP, TIFF, and PNM sources;
* [`advpng`]/[`recompress`]: re-deflates an existing zlib stream (PNG IDAT,
  zlib, or gzip) with Zopfli like `advpng`, leaving everything else alone;
* [`mc_compress_png`]: a lightweight PNG-only brute-forcer that tries a grid
  of filter, level, strategy, and interlacing combinations.

Each call is synchronous and self-contained; nothing is
shared between calls.

```no_run
let raw = std::fs::read("image.png").unwrap();
let out = apretar::compress_png(&raw, None).unwrap();
assert!(out.len() <= raw.len());
```

For custom [`Settings`] or a runtime-chosen [`BackendKind`], build a
[`CompressionRequest`] directly.
*/

#![deny(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::integer_division,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(
	clippy::module_name_repetitions,
	clippy::redundant_pub_crate,
)]

mod backend;
mod buffer;
mod chunk;
mod deflate;
mod effort;
mod error;
mod kind;
mod raster;
mod request;
mod settings;

#[cfg(test)] mod testing;

pub use backend::{
	Backend,
	BackendKind,
	FullRewrite,
	MinimalRecode,
	RecompressOnly,
};
pub use buffer::ImageBuffer;
pub use effort::EffortLevel;
pub use error::{
	ApretarError,
	ErrorKind,
};
pub use kind::ImageKind;
pub use request::{
	CompressionRequest,
	CompressionResult,
};
pub use settings::Settings;



/// # Compress PNG (Full Rewrite).
///
/// Decode the image (PNG, or a single-frame GIF, BMP, TIFF, or PNM) and
/// re-encode it as the smallest PNG `oxipng` can find at the given effort.
///
/// The effort ranges from `0..=7`, defaulting to `2` when `None`.
///
/// ## Errors
///
/// Returns `InvalidArgument` for a bad effort level, `DecodeError` if the
/// source cannot be read, and `EncodeError` if the re-encode fails.
pub fn compress_png(src: &[u8], effort: Option<u8>) -> Result<Vec<u8>, ApretarError> {
	CompressionRequest::new(src, BackendKind::FullRewrite, effort)?
		.run()
		.map(ImageBuffer::into_vec)
}

/// # Recompress PNG (Default Effort).
///
/// Same as [`recompress`], using the backend's default effort.
///
/// ## Errors
///
/// Returns `NotAStream` if the source isn't a PNG, zlib, or gzip stream, or
/// `RecompressionFailed` if the compressor breaks down.
pub fn advpng(src: &[u8]) -> Result<Vec<u8>, ApretarError> {
	recompress(src, None)
}

/// # Recompress Stream.
///
/// Re-deflate the compressed payload of a PNG, zlib, or gzip stream with
/// Zopfli, leaving the decompressed content untouched. For PNGs, every
/// non-`IDAT` chunk is kept as well.
///
/// The effort ranges from `0..=4`, defaulting to `2` when `None`. If no
/// savings are found, the original bytes are returned as-are.
///
/// ## Errors
///
/// Returns `InvalidArgument` for a bad effort level, `NotAStream` if the
/// source isn't a supported container, or `RecompressionFailed` if the
/// compressor breaks down.
pub fn recompress(src: &[u8], effort: Option<u8>) -> Result<Vec<u8>, ApretarError> {
	CompressionRequest::new(src, BackendKind::RecompressOnly, effort)?
		.run()
		.map(ImageBuffer::into_vec)
}

/// # Compress PNG (Minimal Recode).
///
/// Brute-force the PNG's pixel data through a fixed grid of filter, deflate
/// level, deflate strategy, and interlacing combinations, keeping the
/// smallest.
///
/// The effort ranges from `0..=3`. If no savings are found, the original
/// bytes are returned as-are.
///
/// ## Errors
///
/// Returns `InvalidArgument` for a bad effort level, `DecodeError` if the
/// source is not a valid PNG, or `EncodeError` if deflation fails.
pub fn mc_compress_png(src: &[u8], effort: u8) -> Result<Vec<u8>, ApretarError> {
	CompressionRequest::new(src, BackendKind::MinimalRecode, Some(effort))?
		.run()
		.map(ImageBuffer::into_vec)
}
