/*!
# Apretar: Scanline Filters
*/



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
#[repr(u8)]
/// # Row Filter.
///
/// The five PNG filter types, numbered as they appear on the wire.
pub(crate) enum RowFilter {
	/// # None.
	None = 0,

	/// # Sub.
	Sub = 1,

	/// # Up.
	Up = 2,

	/// # Average.
	Average = 3,

	/// # Paeth.
	Paeth = 4,
}

impl RowFilter {
	/// # All Filters.
	pub(crate) const ALL: [Self; 5] = [Self::None, Self::Sub, Self::Up, Self::Average, Self::Paeth];

	/// # Apply.
	///
	/// Filter `row` against the previous (unfiltered) row `prev`, writing
	/// the filter type followed by the filtered bytes to `out`.
	fn apply(self, row: &[u8], prev: &[u8], stride: usize, out: &mut [u8]) {
		out[0] = self as u8;
		let out = &mut out[1..];
		match self {
			Self::None => { out.copy_from_slice(row); },
			Self::Sub => for i in 0..row.len() {
				let a = if stride <= i { row[i - stride] } else { 0 };
				out[i] = row[i].wrapping_sub(a);
			},
			Self::Up => for i in 0..row.len() {
				out[i] = row[i].wrapping_sub(prev[i]);
			},
			Self::Average => for i in 0..row.len() {
				let a = if stride <= i { row[i - stride] } else { 0 };
				out[i] = row[i].wrapping_sub(a.midpoint(prev[i]));
			},
			Self::Paeth => for i in 0..row.len() {
				let (a, c) =
					if stride <= i { (row[i - stride], prev[i - stride]) }
					else { (0, 0) };
				out[i] = row[i].wrapping_sub(paeth(a, prev[i], c));
			},
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Filter Choice.
///
/// Either one filter for every row, or a per-row pick.
pub(crate) enum FilterChoice {
	/// # The Same Filter Everywhere.
	Fixed(RowFilter),

	/// # Adaptive.
	///
	/// Use whichever filter gives the smallest sum of absolute (signed)
	/// byte values for each row, the classic libpng heuristic. Ties go to
	/// the lower filter type.
	MinSum,
}

impl FilterChoice {
	/// # Trial Filters.
	///
	/// Adaptive first, then each fixed filter in order.
	pub(crate) const ALL: [Self; 6] = [
		Self::MinSum,
		Self::Fixed(RowFilter::None),
		Self::Fixed(RowFilter::Sub),
		Self::Fixed(RowFilter::Up),
		Self::Fixed(RowFilter::Average),
		Self::Fixed(RowFilter::Paeth),
	];
}



/// # Filter Rows.
///
/// Filter a block of packed rows, each `row_len` bytes with `stride` bytes
/// per pixel (rounded up), appending the result to `out`. The row before
/// the first is treated as all zeroes.
pub(crate) fn filter_rows(
	rows: &[u8],
	row_len: usize,
	stride: usize,
	choice: FilterChoice,
	out: &mut Vec<u8>,
) {
	if row_len == 0 { return; }

	let zero = vec![0_u8; row_len];
	let mut prev = zero.as_slice();
	let mut scratch = vec![0_u8; row_len + 1];

	for row in rows.chunks_exact(row_len) {
		match choice {
			FilterChoice::Fixed(filter) => {
				filter.apply(row, prev, stride, &mut scratch);
				out.extend_from_slice(&scratch);
			},
			FilterChoice::MinSum => {
				let mut best = Vec::new();
				let mut best_sum = u64::MAX;
				for filter in RowFilter::ALL {
					filter.apply(row, prev, stride, &mut scratch);
					let sum = signed_sum(&scratch[1..]);
					if sum < best_sum {
						best_sum = sum;
						best.clone_from(&scratch);
					}
				}
				out.extend_from_slice(&best);
			},
		}
		prev = row;
	}
}

#[expect(clippy::cast_possible_wrap, reason = "Deliberate.")]
/// # Signed Sum.
///
/// Sum the absolute values of the bytes, interpreted as signed.
fn signed_sum(src: &[u8]) -> u64 {
	src.iter().map(|&b| u64::from((b as i8).unsigned_abs())).sum()
}

/// # Paeth Predictor.
const fn paeth(a: u8, b: u8, c: u8) -> u8 {
	let (ia, ib, ic) = (a as i16, b as i16, c as i16);
	let p = ia + ib - ic;
	let pa = (p - ia).abs();
	let pb = (p - ib).abs();
	let pc = (p - ic).abs();
	if pa <= pb && pa <= pc { a }
	else if pb <= pc { b }
	else { c }
}
