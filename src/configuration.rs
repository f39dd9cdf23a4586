//! Conversion options.
//!
//! [`ConversionOptions`] is a builder that threads the progress callback and
//! the frame image format through both conversions without widening every
//! function signature.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use reframe::{ConversionOptions, FrameImageFormat, ProgressCallback, ProgressInfo};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let options = ConversionOptions::new()
//!     .with_progress(Arc::new(LogProgress))
//!     .with_batch_size(25)
//!     .with_image_format(FrameImageFormat::Jpeg);
//! assert_eq!(options.image_format(), FrameImageFormat::Jpeg);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::frame_files::FrameImageFormat;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Settings shared by extraction and assembly.
///
/// A default-constructed value reports no progress and uses PNG frames.
#[derive(Clone)]
pub struct ConversionOptions {
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) batch_size: u64,
    pub(crate) image_format: FrameImageFormat,
}

impl Debug for ConversionOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConversionOptions")
            .field("batch_size", &self.batch_size)
            .field("image_format", &self.image_format)
            .finish_non_exhaustive()
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionOptions {
    /// Create options with default settings: no progress callback, batch
    /// size 1, PNG frames.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
            image_format: FrameImageFormat::default(),
        }
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires (every N frames).
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the image format frames are written in (extraction) or looked up
    /// by (assembly).
    #[must_use]
    pub fn with_image_format(mut self, format: FrameImageFormat) -> Self {
        self.image_format = format;
        self
    }

    /// The configured progress batch size.
    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// The configured frame image format.
    pub fn image_format(&self) -> FrameImageFormat {
        self.image_format
    }
}
