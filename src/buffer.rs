/*!
# Apretar: Image Buffer
*/

use crate::ImageKind;
use std::ops::Deref;



#[derive(Debug, Clone, Eq, Hash, PartialEq)]
/// # Image Buffer.
///
/// An owned, immutable chunk of (presumably) encoded image data. Buffers
/// are handed to exactly one backend and never modified in place; backends
/// return a brand new buffer instead.
pub struct ImageBuffer(Box<[u8]>);

impl AsRef<[u8]> for ImageBuffer {
	#[inline]
	fn as_ref(&self) -> &[u8] { &self.0 }
}

impl Deref for ImageBuffer {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.0 }
}

impl From<&[u8]> for ImageBuffer {
	#[inline]
	fn from(src: &[u8]) -> Self { Self(Box::from(src)) }
}

impl From<Vec<u8>> for ImageBuffer {
	#[inline]
	fn from(src: Vec<u8>) -> Self { Self(src.into_boxed_slice()) }
}

impl From<ImageBuffer> for Vec<u8> {
	#[inline]
	fn from(src: ImageBuffer) -> Self { src.into_vec() }
}

impl ImageBuffer {
	#[must_use]
	/// # Kind.
	///
	/// Sniff the format from the magic bytes. No further validation is
	/// performed.
	pub fn kind(&self) -> Option<ImageKind> { ImageKind::sniff(&self.0) }

	#[must_use]
	/// # Into Vec.
	pub fn into_vec(self) -> Vec<u8> { self.0.into_vec() }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_buffer() {
		let raw = crate::testing::rgb_png(3, 3, false);
		let buf = ImageBuffer::from(raw.as_slice());
		assert_eq!(buf.len(), raw.len());
		assert_eq!(buf.kind(), Some(ImageKind::Png));
		assert_eq!(buf.as_ref(), raw.as_slice());
		assert_eq!(buf.into_vec(), raw);

		let buf = ImageBuffer::from(b"nope".to_vec());
		assert!(buf.kind().is_none());
		assert_eq!(Vec::<u8>::from(buf), b"nope");
	}
}
