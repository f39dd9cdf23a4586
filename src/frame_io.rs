//! The boundary between the conversions and the codec library.
//!
//! Extraction pulls frames from a [`FrameSource`]; assembly pushes frames into
//! a [`FrameSink`]. [`VideoReader`](crate::VideoReader) and
//! [`VideoWriter`](crate::VideoWriter) are the FFmpeg-backed implementations.

use image::DynamicImage;

use crate::error::ReframeError;

/// A sequentially readable stream of decoded frames.
pub trait FrameSource {
    /// Frames per second advertised by the source.
    fn frame_rate(&self) -> f64;

    /// Frame count advertised by the source. May be approximate; `0` means
    /// unknown.
    fn reported_frame_count(&self) -> u64;

    /// Decode the next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<DynamicImage>, ReframeError>;
}

/// A destination that encodes frames in the order they are written.
///
/// Dropping a sink without calling [`finish`](FrameSink::finish) must still
/// release whatever it holds.
pub trait FrameSink {
    /// Encode one frame.
    fn write_frame(&mut self, frame: &DynamicImage) -> Result<(), ReframeError>;

    /// Flush and close the sink, returning the number of frames written.
    fn finish(self) -> Result<u64, ReframeError>
    where
        Self: Sized;
}
