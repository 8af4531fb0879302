/*!
# Apretar: Recompress Only
*/

use crate::{
	ApretarError,
	Backend,
	BackendKind,
	EffortLevel,
	ImageBuffer,
	Settings,
	chunk::PngParts,
	deflate::{
		Deflater,
		Wrapper,
		gzip_inflate,
		zlib_inflate,
	},
	kind::PNG_SIGNATURE,
};
use std::ops::RangeInclusive;



/// # Effort Ladder.
///
/// Effort `n` tries every rung from zero through `n`, keeping the best.
const LADDER: [Deflater; 5] = [
	Deflater::Miniz(9),
	Deflater::Zopfli(1),
	Deflater::Zopfli(5),
	Deflater::Zopfli(15),
	Deflater::Zopfli(60),
];



#[derive(Debug, Clone, Copy, Default)]
/// # Recompress Only.
///
/// Inflate the existing deflate stream of a PNG (its `IDAT` payload), a
/// raw zlib stream, or a gzip file, and deflate it again as tightly as the
/// effort allows. The decompressed bytes are never touched; neither are any
/// of a PNG's other chunks, though multiple `IDAT`s are merged into one.
pub struct RecompressOnly;

impl Backend for RecompressOnly {
	#[inline]
	fn kind(&self) -> BackendKind { BackendKind::RecompressOnly }

	#[expect(clippy::cast_possible_truncation, reason = "The ladder is tiny.")]
	#[inline]
	fn effort_range(&self) -> RangeInclusive<u8> { 0..=(LADDER.len() - 1) as u8 }

	#[inline]
	fn default_effort(&self) -> u8 { 2 }

	fn encode(&self, src: &ImageBuffer, effort: EffortLevel, _settings: Settings)
	-> Result<ImageBuffer, ApretarError> {
		let stream = Stream::parse(src)?;
		let payload = stream.inflate()?;

		let mut best: Option<Vec<u8>> = None;
		for rung in &LADDER[..=usize::from(effort.get())] {
			let new = rung.compress(&payload, stream.wrapper())
				.map_err(ApretarError::recompression)?;
			log::trace!("{rung:?}: {} bytes.", new.len());
			if best.as_ref().is_none_or(|b| new.len() < b.len()) { best = Some(new); }
		}
		let best = best.ok_or_else(|| ApretarError::recompression("no deflaters ran"))?;

		// Make sure it round-trips before going any further.
		let check = match stream.wrapper() {
			Wrapper::Gzip => gzip_inflate(&best),
			Wrapper::Zlib => zlib_inflate(&best),
		};
		if check.as_deref() != Ok(payload.as_slice()) {
			return Err(ApretarError::recompression("recompressed stream does not match the original"));
		}

		// PNGs are judged by their image data alone; assembly merges IDATs
		// and drops anything after IEND.
		let out = match stream {
			Stream::Png(parts) =>
				if best.len() < parts.idat.len() { parts.assemble(parts.ihdr, &best) }
				else { return Ok(src.clone()); },
			Stream::Gzip(_) | Stream::Zlib(_) => best,
		};

		if out.len() < src.len() { Ok(ImageBuffer::from(out)) }
		else { Ok(src.clone()) }
	}
}



#[derive(Debug)]
/// # Compressed Stream.
enum Stream<'a> {
	/// # Gzip.
	Gzip(&'a [u8]),

	/// # PNG.
	Png(PngParts<'a>),

	/// # Zlib.
	Zlib(&'a [u8]),
}

impl<'a> Stream<'a> {
	/// # Parse.
	///
	/// Figure out what kind of stream we're dealing with.
	fn parse(src: &'a [u8]) -> Result<Self, ApretarError> {
		if src.starts_with(&PNG_SIGNATURE) {
			PngParts::parse(src).map(Self::Png).map_err(ApretarError::not_a_stream)
		}
		else if src.starts_with(&[0x1F, 0x8B]) { Ok(Self::Gzip(src)) }
		else if is_zlib(src) { Ok(Self::Zlib(src)) }
		else { Err(ApretarError::not_a_stream("expected a PNG, zlib, or gzip stream")) }
	}

	/// # Inflate.
	fn inflate(&self) -> Result<Vec<u8>, ApretarError> {
		match self {
			Self::Gzip(raw) => gzip_inflate(raw),
			Self::Png(parts) => zlib_inflate(&parts.idat),
			Self::Zlib(raw) => zlib_inflate(raw),
		}
			.map_err(ApretarError::not_a_stream)
	}

	/// # Wrapper.
	const fn wrapper(&self) -> Wrapper {
		match self {
			Self::Gzip(_) => Wrapper::Gzip,
			Self::Png(_) | Self::Zlib(_) => Wrapper::Zlib,
		}
	}
}

/// # Is Zlib?
///
/// Check for a valid RFC 1950 header: deflate with a sane window, a
/// checksum-consistent flag byte, and no preset dictionary.
fn is_zlib(src: &[u8]) -> bool {
	let [cmf, flg, _, ..] = *src else { return false; };
	cmf & 0x0F == 8 &&
	cmf >> 4 <= 7 &&
	flg & 0x20 == 0 &&
	u16::from_be_bytes([cmf, flg]) % 31 == 0
}
