/*!
# Apretar: Compression Request
*/

use crate::{
	ApretarError,
	BackendKind,
	EffortLevel,
	ImageBuffer,
	Settings,
};
use dactyl::NiceU64;



/// # Compression Result.
///
/// Either a (possibly unchanged) buffer, or exactly one terminal error.
pub type CompressionResult = Result<ImageBuffer, ApretarError>;



#[derive(Debug, Clone)]
/// # Compression Request.
///
/// A source buffer paired with the backend and effort to run it through.
/// Requests are validated on construction and consumed when run.
///
/// ```
/// use apretar::{BackendKind, CompressionRequest, Settings};
///
/// let mut settings = Settings::new();
/// settings.set_max_pixels_raw(b"4m").unwrap();
///
/// let req = CompressionRequest::new(b"not an image", BackendKind::RecompressOnly, Some(0))
///     .unwrap()
///     .with_settings(settings);
/// assert!(req.run().is_err());
/// ```
pub struct CompressionRequest {
	/// # Source.
	src: ImageBuffer,

	/// # Backend.
	kind: BackendKind,

	/// # Effort.
	effort: EffortLevel,

	/// # Settings.
	settings: Settings,
}

impl CompressionRequest {
	/// # New.
	///
	/// Copy the source into a new request. If `effort` is `None`, the
	/// backend's default is used.
	///
	/// The source bytes themselves are not examined until [`run`](Self::run).
	///
	/// ## Errors
	///
	/// Returns an `InvalidArgument` error if the effort is out of range for
	/// the backend.
	pub fn new(src: &[u8], kind: BackendKind, effort: Option<u8>)
	-> Result<Self, ApretarError> {
		let effort = EffortLevel::new(kind, effort)?;
		Ok(Self {
			src: ImageBuffer::from(src),
			kind,
			effort,
			settings: Settings::new(),
		})
	}

	#[must_use]
	/// # With Settings.
	pub const fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = settings;
		self
	}

	#[must_use]
	/// # Backend Kind.
	pub const fn kind(&self) -> BackendKind { self.kind }

	#[must_use]
	/// # Effort.
	pub const fn effort(&self) -> EffortLevel { self.effort }

	/// # Run.
	///
	/// Hand the source to the backend, once, and return whatever it comes
	/// back with.
	///
	/// ## Errors
	///
	/// Any backend error is passed through as-is.
	pub fn run(self) -> CompressionResult {
		let before = self.src.len() as u64;
		let out = self.kind.backend().encode(&self.src, self.effort, self.settings);

		match &out {
			Ok(buf) => {
				let after = buf.len() as u64;
				log::debug!(
					"{} (effort {}): {} -> {} bytes{}.",
					self.kind,
					self.effort,
					NiceU64::from(before),
					NiceU64::from(after),
					if after < before { "" } else { " (no savings)" },
				);
			},
			Err(e) => log::debug!("{} (effort {}): {e}", self.kind, self.effort),
		}

		out
	}
}
