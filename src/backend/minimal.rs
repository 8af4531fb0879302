/*!
# Apretar: Minimal Recode
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
		Strategy,
		zlib_compress,
	},
	raster::{
		FilterChoice,
		Raster,
	},
};
use std::ops::RangeInclusive;



/// # Highest Effort.
const MAX_EFFORT: u8 = 3;

/// # Filters (Quick).
const FILTERS_QUICK: &[FilterChoice] = &[FilterChoice::MinSum];

/// # Filters (All).
const FILTERS_ALL: &[FilterChoice] = &FilterChoice::ALL;

/// # Deflate Levels (Quick).
const LEVELS_QUICK: &[u8] = &[9];

/// # Deflate Levels (All).
const LEVELS_ALL: &[u8] = &[9, 8];

/// # Strategies (Quick).
const STRATEGIES_QUICK: &[Strategy] = &[Strategy::Default];

/// # Strategies (All).
const STRATEGIES_ALL: &[Strategy] = &[
	Strategy::Default,
	Strategy::Filtered,
	Strategy::HuffmanOnly,
];



#[derive(Debug, Clone, Copy, Default)]
/// # Minimal Recode.
///
/// A lightweight, PNG-only brute-forcer: decode the pixels, then re-filter
/// and re-deflate them every which way the effort allows, keeping the
/// smallest. The color type and bit depth are never changed, and every
/// chunk other than `IHDR` and `IDAT` is copied through verbatim.
///
/// | Effort | Filters | Levels | Strategies | Interlacing |
/// | ------ | ------- | ------ | ---------- | ----------- |
/// | 0 | adaptive | 9 | default | as-is |
/// | 1 | adaptive, none, sub, up, average, paeth | 9 | default | as-is |
/// | 2 | same | 9, 8 | default, filtered, huffman | as-is |
/// | 3 | same | 9, 8 | default, filtered, huffman | none, Adam7 |
pub struct MinimalRecode;

impl Backend for MinimalRecode {
	#[inline]
	fn kind(&self) -> BackendKind { BackendKind::MinimalRecode }

	#[inline]
	fn effort_range(&self) -> RangeInclusive<u8> { 0..=MAX_EFFORT }

	#[inline]
	fn default_effort(&self) -> u8 { 2 }

	fn encode(&self, src: &ImageBuffer, effort: EffortLevel, settings: Settings)
	-> Result<ImageBuffer, ApretarError> {
		let parts = PngParts::parse(src)
			.map_err(|e| ApretarError::decode(format_args!("not a valid PNG file ({e})")))?;
		if parts.is_animated() {
			return Err(ApretarError::decode("animated PNGs are not supported"));
		}

		if
			let Some((w, h)) = parts.ihdr.dimensions() &&
			! settings.check_resolution(w, h)
		{
			return Err(ApretarError::decode(format_args!("image is too big ({w}x{h})")));
		}

		let raster = Raster::decode(src).map_err(ApretarError::decode)?;
		if raster.ihdr().with_interlaced(parts.ihdr.interlaced) != parts.ihdr {
			return Err(ApretarError::decode("inconsistent image header"));
		}

		let grid = Grid::new(effort);
		let mut best: Option<(Vec<u8>, bool)> = None;
		for &interlaced in grid.interlacing(parts.ihdr.interlaced) {
			for &filter in grid.filters {
				let data = raster.filtered(filter, interlaced);
				for &level in grid.levels {
					for &strategy in grid.strategies {
						let idat = zlib_compress(&data, level, strategy)
							.map_err(ApretarError::encode)?;
						log::trace!(
							"{filter:?}, level {level}, {strategy:?}, interlaced {interlaced}: {} bytes.",
							idat.len(),
						);
						if best.as_ref().is_none_or(|(b, _)| idat.len() < b.len()) {
							best = Some((idat, interlaced));
						}
					}
				}
			}
		}

		// Only the image data is compared; assembly drops anything after
		// IEND.
		let Some((idat, interlaced)) = best else { return Ok(src.clone()); };
		if parts.idat.len() <= idat.len() { return Ok(src.clone()); }

		let out = parts.assemble(parts.ihdr.with_interlaced(interlaced), &idat);
		if out.len() < src.len() { Ok(ImageBuffer::from(out)) }
		else { Ok(src.clone()) }
	}
}



#[derive(Debug, Clone, Copy)]
/// # Trial Grid.
struct Grid {
	/// # Filters.
	filters: &'static [FilterChoice],

	/// # Deflate Levels.
	levels: &'static [u8],

	/// # Deflate Strategies.
	strategies: &'static [Strategy],

	/// # Try Both Interlacings?
	both_interlacings: bool,
}

impl Grid {
	/// # New.
	///
	/// Each level is a superset of the one before it.
	const fn new(effort: EffortLevel) -> Self {
		let effort = effort.get();
		let (levels, strategies) =
			if effort < 2 { (LEVELS_QUICK, STRATEGIES_QUICK) }
			else { (LEVELS_ALL, STRATEGIES_ALL) };

		Self {
			filters: if effort == 0 { FILTERS_QUICK } else { FILTERS_ALL },
			levels,
			strategies,
			both_interlacings: MAX_EFFORT <= effort,
		}
	}

	/// # Interlacing Options.
	const fn interlacing(self, current: bool) -> &'static [bool] {
		if self.both_interlacings { &[false, true] }
		else if current { &[true] }
		else { &[false] }
	}

	#[cfg(test)]
	/// # Trial Count.
	const fn len(self) -> usize {
		self.filters.len() *
		self.levels.len() *
		self.strategies.len() *
		if self.both_interlacings { 2 } else { 1 }
	}
}
