//! Progress reporting.
//!
//! Both conversions report how many frames they have handled through a
//! [`ProgressCallback`]. Reporting is purely observational: a callback cannot
//! change or stop the operation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reframe::{ConversionOptions, ProgressCallback, ProgressInfo, ReframeError};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let options = ConversionOptions::new().with_progress(Arc::new(PrintProgress));
//! reframe::video_to_frames_with_options("input.mp4", "frames", &options)?;
//! # Ok::<(), ReframeError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// The conversion currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Writing video frames out as image files.
    FrameExtraction,
    /// Encoding image files into a video.
    FrameAssembly,
}

/// A snapshot of conversion progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Which conversion is running.
    pub operation: OperationType,
    /// Frames handled so far.
    pub current: u64,
    /// Frames expected in total, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Ordinal of the frame that was just handled.
    pub current_frame: Option<u64>,
}

/// Receives progress updates during a conversion.
///
/// Implementations must be [`Send`] and [`Sync`] so that they can forward
/// updates to other threads (a UI thread, a progress bar, etc.).
pub trait ProgressCallback: Send + Sync {
    /// Called every `batch_size` frames and once when the operation ends.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. This is the default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks timing for one operation and fires the callback.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    items_since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            items_since_last_report: 0,
        }
    }

    /// Record one handled frame and report if the batch threshold is reached.
    pub(crate) fn advance(&mut self, frame_number: u64) {
        self.current += 1;
        self.items_since_last_report += 1;

        if self.items_since_last_report >= self.batch_size {
            self.report(Some(frame_number));
            self.items_since_last_report = 0;
        }
    }

    /// Unconditionally emit a final report.
    pub(crate) fn finish(&mut self) {
        self.report(None);
    }

    fn report(&self, frame_number: Option<u64>) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);

        let estimated_remaining = if self.current > 0 {
            self.total.map(|total| {
                let remaining = total.saturating_sub(self.current);
                elapsed.mul_f64(remaining as f64 / self.current as f64)
            })
        } else {
            None
        };

        self.callback.on_progress(&ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame_number,
        });
    }
}
