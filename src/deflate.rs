/*!
# Apretar: Deflate

Thin wrappers around the deflate implementations used by the backends:
`miniz_oxide` for fast, strategy-aware compression and strict inflation,
`zopfli` for slow-but-small compression, and `flate2` for gzip framing.
*/

use miniz_oxide::{
	deflate::core::{
		compress,
		CompressorOxide,
		create_comp_flags_from_zip_params,
		TDEFLFlush,
		TDEFLStatus,
	},
	inflate::decompress_to_vec_zlib,
};
use std::{
	io::{
		self,
		Read,
		Write,
	},
	num::NonZeroU8,
};



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Zlib Strategy.
///
/// These mirror zlib's `Z_DEFAULT_STRATEGY`, `Z_FILTERED`, and
/// `Z_HUFFMAN_ONLY`, which `miniz_oxide` honors as well.
pub(crate) enum Strategy {
	/// # Default.
	Default,

	/// # Filtered.
	///
	/// Favors Huffman coding over short matches; meant for filtered data.
	Filtered,

	/// # Huffman Only.
	///
	/// No string matching at all.
	HuffmanOnly,
}

impl Strategy {
	/// # As Zlib Constant.
	const fn as_zlib(self) -> i32 {
		match self {
			Self::Default => 0,
			Self::Filtered => 1,
			Self::HuffmanOnly => 2,
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Stream Wrapper.
pub(crate) enum Wrapper {
	/// # Gzip (RFC 1952).
	Gzip,

	/// # Zlib (RFC 1950).
	Zlib,
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Deflater.
///
/// One rung of a recompression ladder.
pub(crate) enum Deflater {
	/// # `miniz_oxide` at the given level.
	Miniz(u8),

	/// # Zopfli with the given number of iterations.
	Zopfli(u8),
}

impl Deflater {
	/// # Compress.
	///
	/// Deflate `src` in full, wrapping the result as requested.
	///
	/// ## Errors
	///
	/// Compressor failures are passed through.
	pub(crate) fn compress(self, src: &[u8], wrapper: Wrapper) -> io::Result<Vec<u8>> {
		match (self, wrapper) {
			(Self::Miniz(level), Wrapper::Zlib) => zlib_compress(src, level, Strategy::Default),
			(Self::Miniz(level), Wrapper::Gzip) => {
				let mut enc = flate2::write::GzEncoder::new(
					Vec::with_capacity(src.len() / 2),
					flate2::Compression::new(u32::from(level)),
				);
				enc.write_all(src)?;
				enc.finish()
			},
			(Self::Zopfli(iterations), _) => {
				let opts = zopfli::Options {
					iteration_count: NonZeroU8::new(iterations).unwrap_or(NonZeroU8::MIN),
					..zopfli::Options::default()
				};
				let fmt = match wrapper {
					Wrapper::Gzip => zopfli::Format::Gzip,
					Wrapper::Zlib => zopfli::Format::Zlib,
				};
				let mut out = Vec::with_capacity(src.len() / 2);
				zopfli::compress(&opts, &fmt, src, &mut out)?;
				Ok(out)
			},
		}
	}
}



/// # Zlib Compress.
///
/// Deflate `src` into a zlib stream using `miniz_oxide` with an explicit
/// level (`0..=10`) and strategy.
///
/// ## Errors
///
/// This only fails if `miniz_oxide` rejects the parameters or stops making
/// progress, neither of which should happen.
pub(crate) fn zlib_compress(mut src: &[u8], level: u8, strategy: Strategy)
-> io::Result<Vec<u8>> {
	let flags = create_comp_flags_from_zip_params(i32::from(level), 15, strategy.as_zlib());
	let mut state = Box::new(CompressorOxide::new(flags));
	let mut out = vec![0_u8; (src.len() / 2).max(64)];
	let mut pos = 0;

	loop {
		let (status, read, written) = compress(&mut state, src, &mut out[pos..], TDEFLFlush::Finish);
		pos += written;
		match status {
			TDEFLStatus::Done => {
				out.truncate(pos);
				return Ok(out);
			},
			TDEFLStatus::Okay if read <= src.len() => {
				src = &src[read..];
				if out.len() - pos < 64 { out.resize(out.len() * 2, 0); }
			},
			_ => return Err(io::Error::other(format!("miniz_oxide: {status:?}"))),
		}
	}
}

/// # Zlib Inflate.
///
/// ## Errors
///
/// Returns a description of the failure if the stream is invalid or
/// incomplete.
pub(crate) fn zlib_inflate(src: &[u8]) -> Result<Vec<u8>, String> {
	decompress_to_vec_zlib(src)
		.map_err(|e| format!("zlib inflate failed ({:?})", e.status))
}

/// # Gzip Inflate.
///
/// Multi-member streams are concatenated, same as `gunzip`.
///
/// ## Errors
///
/// Returns a description of the failure if any member is invalid or
/// incomplete.
pub(crate) fn gzip_inflate(src: &[u8]) -> Result<Vec<u8>, String> {
	let mut out = Vec::with_capacity(src.len().saturating_mul(2));
	flate2::read::MultiGzDecoder::new(src)
		.read_to_end(&mut out)
		.map_err(|e| format!("gzip inflate failed ({e})"))?;
	Ok(out)
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Sample Payload.
	fn payload() -> Vec<u8> {
		b"The quick brown fox jumps over the lazy dog. ".iter()
			.copied()
			.cycle()
			.take(4096)
			.chain((0..=255_u8).cycle().take(1024))
			.collect()
	}

	#[test]
	fn t_zlib_strategies() {
		let src = payload();
		for level in [1, 6, 9, 10] {
			for strategy in [Strategy::Default, Strategy::Filtered, Strategy::HuffmanOnly] {
				let Ok(out) = zlib_compress(&src, level, strategy) else {
					panic!("Compression failed: {level} {strategy:?}.");
				};
				assert!(out.len() < src.len(), "No savings: {level} {strategy:?}.");
				assert_eq!(zlib_inflate(&out).as_deref(), Ok(src.as_slice()));
			}
		}

		// Matching beats not-matching for repetitive text.
		let (Ok(a), Ok(b)) = (
			zlib_compress(&src, 9, Strategy::Default),
			zlib_compress(&src, 9, Strategy::HuffmanOnly),
		) else { panic!("Compression failed."); };
		assert!(a.len() < b.len());

		// Empty input still makes a valid stream.
		let Ok(out) = zlib_compress(&[], 9, Strategy::Default) else {
			panic!("Empty compression failed.");
		};
		assert_eq!(zlib_inflate(&out).as_deref(), Ok(&[][..]));
	}

	#[test]
	fn t_deflaters() {
		let src = payload();
		for deflater in [Deflater::Miniz(9), Deflater::Zopfli(1)] {
			let Ok(zlib) = deflater.compress(&src, Wrapper::Zlib) else {
				panic!("{deflater:?} zlib failed.");
			};
			assert_eq!(zlib_inflate(&zlib).as_deref(), Ok(src.as_slice()));

			let Ok(gzip) = deflater.compress(&src, Wrapper::Gzip) else {
				panic!("{deflater:?} gzip failed.");
			};
			assert_eq!(&gzip[..2], &[0x1F, 0x8B]);
			assert_eq!(gzip_inflate(&gzip).as_deref(), Ok(src.as_slice()));
		}
	}

	#[test]
	fn t_inflate_errors() {
		let Ok(zlib) = zlib_compress(&payload(), 9, Strategy::Default) else {
			panic!("Compression failed.");
		};
		assert!(zlib_inflate(&zlib[..zlib.len() / 2]).is_err());
		assert!(zlib_inflate(b"not a stream").is_err());
		assert!(gzip_inflate(b"\x1f\x8bnot really").is_err());
	}
}
