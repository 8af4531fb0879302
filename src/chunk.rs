/*!
# Apretar: PNG Chunks

Just enough PNG structure to pull a file apart into its header, ancillary
chunks, and (concatenated) `IDAT` payload, and stitch it back together
around a new payload.
*/

use crate::kind::PNG_SIGNATURE;
use std::{
	fmt,
	num::NonZeroU32,
};



/// # Maximum Chunk Length.
///
/// Chunk lengths are four bytes, but the PNG specification caps them at
/// `i32::MAX`.
const MAX_CHUNK_LEN: usize = 0x7FFF_FFFF;

/// # IEND Chunk.
const IEND: [u8; 12] = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82];



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Chunk Error.
pub(crate) enum ChunkError {
	/// # Bad Checksum.
	Crc([u8; 4]),

	/// # Bad IHDR.
	Ihdr,

	/// # Non-Contiguous IDAT.
	Idat,

	/// # Invalid Chunk Type.
	Kind,

	/// # Chunk Too Long.
	Length,

	/// # No IDAT.
	NoIdat,

	/// # No IEND.
	NoEnd,

	/// # Missing Signature.
	Signature,

	/// # Truncated.
	Truncated,
}

impl fmt::Display for ChunkError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Crc(kind) => write!(
				f,
				"CRC mismatch in {} chunk",
				String::from_utf8_lossy(kind),
			),
			Self::Ihdr => f.write_str("missing or invalid IHDR"),
			Self::Idat => f.write_str("IDAT chunks are not contiguous"),
			Self::Kind => f.write_str("invalid chunk type"),
			Self::Length => f.write_str("chunk length out of range"),
			Self::NoIdat => f.write_str("no IDAT chunks"),
			Self::NoEnd => f.write_str("missing IEND"),
			Self::Signature => f.write_str("not a PNG"),
			Self::Truncated => f.write_str("truncated chunk"),
		}
	}
}



#[derive(Debug, Clone, Copy)]
/// # Chunk.
///
/// A borrowed view of one chunk. The raw bytes include the length, type,
/// and CRC so it can be copied back out verbatim.
pub(crate) struct Chunk<'a> {
	/// # Type.
	kind: [u8; 4],

	/// # Raw Bytes (Everything).
	raw: &'a [u8],
}

impl<'a> Chunk<'a> {
	/// # Chunk Type.
	pub(crate) const fn kind(&self) -> [u8; 4] { self.kind }

	/// # Data.
	pub(crate) fn data(&self) -> &'a [u8] { &self.raw[8..self.raw.len() - 4] }

	/// # Raw.
	pub(crate) const fn raw(&self) -> &'a [u8] { self.raw }
}

/// # Chunk Iterator.
///
/// Yields (CRC-checked) chunks until `IEND`, or an error, whichever comes
/// first. The signature must already be stripped.
struct ChunkIter<'a> {
	/// # Remaining Data.
	rest: &'a [u8],

	/// # Done?
	done: bool,
}

impl<'a> Iterator for ChunkIter<'a> {
	type Item = Result<Chunk<'a>, ChunkError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done { return None; }
		let out = self.read();
		if out.as_ref().map_or(true, |c| c.kind == *b"IEND") { self.done = true; }
		Some(out)
	}
}

impl<'a> ChunkIter<'a> {
	/// # Read Next.
	fn read(&mut self) -> Result<Chunk<'a>, ChunkError> {
		if self.rest.is_empty() { return Err(ChunkError::NoEnd); }
		let [l1, l2, l3, l4, k1, k2, k3, k4, ..] = *self.rest else {
			return Err(ChunkError::Truncated);
		};

		let len = u32::from_be_bytes([l1, l2, l3, l4]) as usize;
		if MAX_CHUNK_LEN < len { return Err(ChunkError::Length); }

		let kind = [k1, k2, k3, k4];
		if ! kind.iter().all(u8::is_ascii_alphabetic) { return Err(ChunkError::Kind); }

		let raw = self.rest.get(..len + 12).ok_or(ChunkError::Truncated)?;
		let (body, crc) = raw[4..].split_at(len + 4);
		if crc32fast::hash(body).to_be_bytes() != crc {
			return Err(ChunkError::Crc(kind));
		}

		self.rest = &self.rest[len + 12..];
		Ok(Chunk { kind, raw })
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Image Header.
pub(crate) struct Ihdr {
	/// # Width.
	pub(crate) width: u32,

	/// # Height.
	pub(crate) height: u32,

	/// # Bit Depth.
	pub(crate) bit_depth: u8,

	/// # Color Type.
	pub(crate) color_type: u8,

	/// # Adam7 Interlacing?
	pub(crate) interlaced: bool,
}

impl Ihdr {
	/// # Parse.
	///
	/// Parse and validate the thirteen IHDR data bytes.
	pub(crate) fn parse(data: &[u8]) -> Result<Self, ChunkError> {
		let [w1, w2, w3, w4, h1, h2, h3, h4, bit_depth, color_type, 0, 0, interlace] = *data else {
			return Err(ChunkError::Ihdr);
		};

		let width = u32::from_be_bytes([w1, w2, w3, w4]);
		let height = u32::from_be_bytes([h1, h2, h3, h4]);
		if
			width == 0 || height == 0 ||
			MAX_CHUNK_LEN < width as usize || MAX_CHUNK_LEN < height as usize ||
			1 < interlace
		{
			return Err(ChunkError::Ihdr);
		}

		let valid = match color_type {
			0 => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
			3 => matches!(bit_depth, 1 | 2 | 4 | 8),
			2 | 4 | 6 => matches!(bit_depth, 8 | 16),
			_ => false,
		};
		if valid {
			Ok(Self { width, height, bit_depth, color_type, interlaced: interlace == 1 })
		}
		else { Err(ChunkError::Ihdr) }
	}

	/// # To Bytes.
	pub(crate) fn to_bytes(self) -> [u8; 13] {
		let [w1, w2, w3, w4] = self.width.to_be_bytes();
		let [h1, h2, h3, h4] = self.height.to_be_bytes();
		[
			w1, w2, w3, w4,
			h1, h2, h3, h4,
			self.bit_depth,
			self.color_type,
			0,
			0,
			u8::from(self.interlaced),
		]
	}

	/// # Dimensions.
	pub(crate) const fn dimensions(self) -> Option<(NonZeroU32, NonZeroU32)> {
		match (NonZeroU32::new(self.width), NonZeroU32::new(self.height)) {
			(Some(w), Some(h)) => Some((w, h)),
			_ => None,
		}
	}

	/// # With Interlacing.
	pub(crate) const fn with_interlaced(self, interlaced: bool) -> Self {
		Self { interlaced, ..self }
	}
}

impl Ihdr {
	/// # Channels.
	pub(crate) const fn channels(self) -> usize {
		match self.color_type {
			2 => 3,
			4 => 2,
			6 => 4,
			_ => 1,
		}
	}

	/// # Bits Per Pixel.
	pub(crate) const fn bits_per_pixel(self) -> usize {
		self.channels() * self.bit_depth as usize
	}

	/// # Filter Stride.
	///
	/// The distance, in bytes, to the "left" pixel for filtering purposes.
	/// Sub-byte depths round up to one.
	pub(crate) const fn stride(self) -> usize {
		let bytes = self.bits_per_pixel() / 8;
		if bytes == 0 { 1 } else { bytes }
	}

	/// # Row Bytes.
	///
	/// The packed length of a (non-filtered) scanline `width` pixels wide.
	pub(crate) const fn row_bytes(self, width: usize) -> usize {
		(width * self.bits_per_pixel()).div_ceil(8)
	}
}



#[derive(Debug)]
/// # PNG Parts.
///
/// A PNG split into everything-before the image data, the image data
/// itself, and everything-after.
pub(crate) struct PngParts<'a> {
	/// # Header.
	pub(crate) ihdr: Ihdr,

	/// # Chunks Between IHDR and IDAT.
	head: Vec<Chunk<'a>>,

	/// # Concatenated IDAT Payload.
	pub(crate) idat: Vec<u8>,

	/// # Chunks Between IDAT and IEND.
	tail: Vec<Chunk<'a>>,
}

impl<'a> PngParts<'a> {
	/// # Parse.
	///
	/// Split a PNG into its parts, verifying chunk lengths and checksums
	/// along the way. Anything after `IEND` is ignored.
	///
	/// ## Errors
	///
	/// An error is returned if the signature, IHDR, or any chunk framing is
	/// bad, or there are no (or non-contiguous) IDAT chunks.
	pub(crate) fn parse(src: &'a [u8]) -> Result<Self, ChunkError> {
		let rest = src.strip_prefix(&PNG_SIGNATURE).ok_or(ChunkError::Signature)?;
		let mut iter = ChunkIter { rest, done: false };

		// IHDR always comes first.
		let first = iter.next().ok_or(ChunkError::Ihdr)??;
		if first.kind != *b"IHDR" { return Err(ChunkError::Ihdr); }
		let ihdr = Ihdr::parse(first.data())?;

		let mut head = Vec::new();
		let mut idat = Vec::new();
		let mut tail = Vec::new();
		let mut seen_idat = false;
		for chunk in iter {
			let chunk = chunk?;
			match &chunk.kind {
				b"IEND" => {
					if seen_idat { return Ok(Self { ihdr, head, idat, tail }); }
					return Err(ChunkError::NoIdat);
				},
				b"IHDR" => return Err(ChunkError::Ihdr),
				b"IDAT" =>
					if tail.is_empty() {
						seen_idat = true;
						idat.extend_from_slice(chunk.data());
					}
					else { return Err(ChunkError::Idat); },
				_ =>
					if seen_idat { tail.push(chunk); }
					else { head.push(chunk); },
			}
		}

		// The iterator only stops early on IEND or error.
		Err(ChunkError::NoEnd)
	}

	/// # Animated?
	///
	/// Returns `true` if this is actually an APNG.
	pub(crate) fn is_animated(&self) -> bool {
		self.head.iter().any(|c| c.kind() == *b"acTL")
	}

	/// # Assemble.
	///
	/// Build a complete PNG from the original parts, swapping in a new
	/// header and `IDAT` payload. Everything else is copied verbatim.
	pub(crate) fn assemble(&self, ihdr: Ihdr, idat: &[u8]) -> Vec<u8> {
		let extra: usize = self.head.iter().chain(self.tail.iter())
			.map(|c| c.raw().len())
			.sum();
		let mut out = Vec::with_capacity(8 + 25 + extra + idat.len() + 12 + IEND.len());

		out.extend_from_slice(&PNG_SIGNATURE);
		write_chunk(&mut out, *b"IHDR", &ihdr.to_bytes());
		for chunk in &self.head { out.extend_from_slice(chunk.raw()); }

		if idat.is_empty() { write_chunk(&mut out, *b"IDAT", &[]); }
		else {
			for part in idat.chunks(MAX_CHUNK_LEN) { write_chunk(&mut out, *b"IDAT", part); }
		}

		for chunk in &self.tail { out.extend_from_slice(chunk.raw()); }
		out.extend_from_slice(&IEND);
		out
	}
}



/// # Write Chunk.
///
/// Append a complete chunk (length, type, data, CRC) to `out`.
pub(crate) fn write_chunk(out: &mut Vec<u8>, kind: [u8; 4], data: &[u8]) {
	let mut hasher = crc32fast::Hasher::new();
	hasher.update(&kind);
	hasher.update(data);

	#[expect(clippy::cast_possible_truncation, reason = "Capped by MAX_CHUNK_LEN.")]
	let len = data.len().min(MAX_CHUNK_LEN) as u32;

	out.extend_from_slice(&len.to_be_bytes());
	out.extend_from_slice(&kind);
	out.extend_from_slice(data);
	out.extend_from_slice(&hasher.finalize().to_be_bytes());
}
