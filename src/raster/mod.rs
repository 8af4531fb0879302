/*!
# Apretar: Raster

Decoded (but still packed) pixel data, and the means to turn it back into
filtered scanlines ready for deflating.
*/

mod filter;
mod interlace;

pub(crate) use filter::FilterChoice;
#[cfg(test)] pub(crate) use filter::RowFilter;
use filter::filter_rows;

use crate::chunk::Ihdr;
use std::io::Cursor;



#[derive(Debug)]
/// # Raster.
///
/// The image's pixels in their native color type and bit depth, one packed
/// row after another with no filter bytes and no interlacing.
pub(crate) struct Raster {
	/// # Header.
	ihdr: Ihdr,

	/// # Pixels.
	pixels: Vec<u8>,
}

impl Raster {
	/// # Decode.
	///
	/// Decode a PNG's pixels with the `png` crate, leaving the color type
	/// and bit depth alone. Interlaced sources are deinterlaced.
	///
	/// ## Errors
	///
	/// Any decoding error is passed through.
	pub(crate) fn decode(src: &[u8]) -> Result<Self, png::DecodingError> {
		let mut decoder = png::Decoder::new(Cursor::new(src));
		decoder.set_transformations(png::Transformations::IDENTITY);
		let mut reader = decoder.read_info()?;

		let ihdr = {
			let info = reader.info();
			Ihdr {
				width: info.width,
				height: info.height,
				bit_depth: info.bit_depth as u8,
				color_type: info.color_type as u8,
				interlaced: info.interlaced,
			}
		};

		let mut pixels = vec![0_u8; reader.output_buffer_size()];
		let frame = reader.next_frame(&mut pixels)?;
		pixels.truncate(frame.buffer_size());

		Ok(Self { ihdr, pixels })
	}

	#[cfg(test)]
	/// # From Parts.
	pub(crate) const fn from_parts(ihdr: Ihdr, pixels: Vec<u8>) -> Self {
		Self { ihdr, pixels }
	}

	/// # Header.
	pub(crate) const fn ihdr(&self) -> Ihdr { self.ihdr }

	/// # Filtered Scanlines.
	///
	/// Return the complete (pre-deflate) image datastream for the given
	/// filter and interlacing choices.
	pub(crate) fn filtered(&self, choice: FilterChoice, interlaced: bool) -> Vec<u8> {
		let stride = self.ihdr.stride();
		let mut out = Vec::with_capacity(self.pixels.len() + self.ihdr.height as usize * 2);

		if interlaced {
			for pass in interlace::passes(self.ihdr, &self.pixels) {
				let row_len = self.ihdr.row_bytes(pass.width);
				filter_rows(&pass.data, row_len, stride, choice, &mut out);
			}
		}
		else {
			let row_len = self.ihdr.row_bytes(self.ihdr.width as usize);
			filter_rows(&self.pixels, row_len, stride, choice, &mut out);
		}

		out
	}
}
