/*!
# Apretar: Adam7
*/

use crate::chunk::Ihdr;



/// # Adam7 Passes.
///
/// The `(x, y)` start and `(dx, dy)` step of each of the seven passes.
const PASSES: [(usize, usize, usize, usize); 7] = [
	(0, 0, 8, 8),
	(4, 0, 8, 8),
	(0, 4, 4, 8),
	(2, 0, 4, 4),
	(0, 2, 2, 4),
	(1, 0, 2, 2),
	(0, 1, 1, 2),
];



#[derive(Debug)]
/// # Reduced Image.
///
/// The packed (unfiltered) scanlines of one Adam7 pass.
pub(crate) struct Pass {
	/// # Width (Pixels).
	pub(crate) width: usize,

	/// # Packed Rows.
	pub(crate) data: Vec<u8>,
}

/// # Split Into Passes.
///
/// Break a full, non-interlaced image into its Adam7 reduced images. Passes
/// with no pixels (possible for very small images) are omitted entirely,
/// as they contribute nothing to the datastream.
pub(crate) fn passes(ihdr: Ihdr, pixels: &[u8]) -> Vec<Pass> {
	let width = ihdr.width as usize;
	let height = ihdr.height as usize;
	let src_stride = ihdr.row_bytes(width);
	let bpp = ihdr.bits_per_pixel();

	let mut out = Vec::with_capacity(PASSES.len());
	for (x0, y0, dx, dy) in PASSES {
		if width <= x0 || height <= y0 { continue; }
		let pass_width = (width - x0).div_ceil(dx);
		let pass_height = (height - y0).div_ceil(dy);
		let dst_stride = ihdr.row_bytes(pass_width);
		let mut data = vec![0_u8; dst_stride * pass_height];

		for (row, y) in data.chunks_exact_mut(dst_stride).zip((y0..height).step_by(dy)) {
			let src = &pixels[y * src_stride..(y + 1) * src_stride];
			for (i, x) in (x0..width).step_by(dx).enumerate() {
				copy_pixel(src, x, row, i, bpp);
			}
		}

		out.push(Pass { width: pass_width, data });
	}

	out
}

#[expect(clippy::cast_possible_truncation, reason = "Sub-byte shifts are always < 8.")]
/// # Copy Pixel.
///
/// Copy the `x`th pixel of `src` into the `i`th pixel of `dst`, both
/// packed rows with `bpp` bits per pixel.
fn copy_pixel(src: &[u8], x: usize, dst: &mut [u8], i: usize, bpp: usize) {
	if bpp < 8 {
		let mask = (1_u8 << bpp) - 1;
		let from = x * bpp;
		let to = i * bpp;
		let v = (src[from / 8] >> (8 - bpp - from % 8)) & mask;
		dst[to / 8] |= v << (8 - bpp - to % 8);
	}
	else {
		let bytes = bpp / 8;
		dst[i * bytes..(i + 1) * bytes].copy_from_slice(&src[x * bytes..(x + 1) * bytes]);
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Header.
	fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Ihdr {
		Ihdr { width, height, bit_depth, color_type, interlaced: true }
	}

	#[test]
	fn t_pass_sizes() {
		// 8x8 gives the textbook layout.
		let pixels: Vec<u8> = (0..64).collect();
		let out = passes(ihdr(8, 8, 8, 0), &pixels);
		let sizes: Vec<usize> = out.iter().map(|p| p.data.len()).collect();
		assert_eq!(sizes, [1, 1, 2, 4, 8, 16, 32]);

		// Pass one is the top-left pixel; pass two its neighbor four over.
		assert_eq!(out[0].data, [0]);
		assert_eq!(out[1].data, [4]);
		assert_eq!(out[2].data, [32, 36]);
		assert_eq!(out[6].data[..8], [8, 9, 10, 11, 12, 13, 14, 15]);

		// A single pixel only has a first pass.
		let out = passes(ihdr(1, 1, 8, 2), &[1, 2, 3]);
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].width, 1);
		assert_eq!(out[0].data, [1, 2, 3]);

		// A 3x2 image skips the passes starting at x=4 or y=2+.
		let out = passes(ihdr(3, 2, 8, 0), &[0, 1, 2, 3, 4, 5]);
		let data: Vec<&[u8]> = out.iter().map(|p| p.data.as_slice()).collect();
		assert_eq!(data, [&[0][..], &[2], &[1], &[3, 4, 5]]);
	}

	#[test]
	fn t_sub_byte() {
		// A 1-bit, 9x1 image: 1 0 1 1 0 0 1 0 | 1.
		let out = passes(ihdr(9, 1, 1, 0), &[0b1011_0010, 0b1000_0000]);
		let data: Vec<(usize, &[u8])> = out.iter()
			.map(|p| (p.width, p.data.as_slice()))
			.collect();
		assert_eq!(data, [
			(2, &[0b1100_0000][..]), // x = 0, 8
			(1, &[0b0000_0000]),     // x = 4
			(2, &[0b1100_0000]),     // x = 2, 6
			(4, &[0b0100_0000]),     // x = 1, 3, 5, 7
		]);

		// 2-bit samples straddle nibbles.
		let out = passes(ihdr(2, 1, 2, 0), &[0b1101_0000]);
		assert_eq!(out.len(), 2);
		assert_eq!(out[0].data, [0b1100_0000]);
		assert_eq!(out[1].data, [0b0100_0000]);
	}
}
