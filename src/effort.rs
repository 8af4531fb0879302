/*!
# Apretar: Effort Level
*/

use crate::{
	ApretarError,
	BackendKind,
};
use std::fmt;



#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # Effort Level.
///
/// An ordinal trading CPU time for output size. Each backend declares its
/// own bounds; within those bounds, more effort is never worse, only
/// slower.
///
/// Instances can only be built via [`EffortLevel::new`], which checks the
/// value against the backend's range.
pub struct EffortLevel(u8);

impl fmt::Display for EffortLevel {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		<u8 as fmt::Display>::fmt(&self.0, f)
	}
}

impl EffortLevel {
	/// # New.
	///
	/// Validate `level` against the backend's declared range, or use the
	/// backend's default if `None`.
	///
	/// ## Errors
	///
	/// Returns an `InvalidArgument` error if the level is out of range.
	pub fn new(kind: BackendKind, level: Option<u8>) -> Result<Self, ApretarError> {
		let backend = kind.backend();
		let Some(level) = level else { return Ok(Self(backend.default_effort())); };

		let range = backend.effort_range();
		if range.contains(&level) { Ok(Self(level)) }
		else {
			Err(ApretarError::invalid(format_args!(
				"{} effort must be between {}..={}; got {level}",
				kind.as_str(),
				range.start(),
				range.end(),
			)))
		}
	}

	#[must_use]
	/// # Get.
	pub const fn get(self) -> u8 { self.0 }
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::ErrorKind;

	#[test]
	fn t_new() {
		for (kind, min, max, default) in [
			(BackendKind::FullRewrite, 0, 7, 2),
			(BackendKind::RecompressOnly, 0, 4, 2),
			(BackendKind::MinimalRecode, 0, 3, 2),
		] {
			assert_eq!(EffortLevel::new(kind, None).map(EffortLevel::get), Ok(default));
			assert_eq!(EffortLevel::new(kind, Some(min)).map(EffortLevel::get), Ok(min));
			assert_eq!(EffortLevel::new(kind, Some(max)).map(EffortLevel::get), Ok(max));

			// One past the end is no good.
			let Err(err) = EffortLevel::new(kind, Some(max + 1)) else {
				panic!("{kind:?} accepted effort {}.", max + 1);
			};
			assert_eq!(err.kind(), ErrorKind::InvalidArgument);
			assert!(err.to_string().contains(&format!("{min}..={max}")));

			assert!(EffortLevel::new(kind, Some(u8::MAX)).is_err());
		}
	}
}
