//! Video → frame directory.
//!
//! [`video_to_frames`] writes `metadata.txt` and one numbered image per
//! decoded frame into an output directory. [`extract_frames`] is the same
//! loop over any [`FrameSource`].
//!
//! # Example
//!
//! ```no_run
//! let summary = reframe::video_to_frames("input.mp4", "frames")?;
//! println!("wrote {} frames", summary.frames_written);
//! # Ok::<(), reframe::ReframeError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    configuration::ConversionOptions,
    decoder::VideoReader,
    error::ReframeError,
    frame_files::{self, MAX_FRAME_FILES},
    frame_io::FrameSource,
    metadata::FrameMetadata,
    progress::{OperationType, ProgressTracker},
};

/// Outcome of an extraction run.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ExtractionSummary {
    /// Directory the frames were written to.
    pub output_dir: PathBuf,
    /// The metadata record that was written.
    pub metadata: FrameMetadata,
    /// Number of image files written.
    pub frames_written: u64,
}

/// Extract every frame of `video_path` into `output_dir` as PNG files.
///
/// Equivalent to [`video_to_frames_with_options`] with default options.
pub fn video_to_frames<P, Q>(video_path: P, output_dir: Q) -> Result<ExtractionSummary, ReframeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    video_to_frames_with_options(video_path, output_dir, &ConversionOptions::default())
}

/// Extract every frame of `video_path` into `output_dir`.
///
/// The directory is created if needed. The reader is dropped, and the file
/// closed, before this function returns.
///
/// # Errors
///
/// - [`ReframeError::FileOpen`] if the video cannot be opened or decoded.
/// - [`ReframeError::IoError`] / [`ReframeError::ImageError`] if the
///   directory, metadata or a frame cannot be written.
pub fn video_to_frames_with_options<P, Q>(
    video_path: P,
    output_dir: Q,
    options: &ConversionOptions,
) -> Result<ExtractionSummary, ReframeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut reader = VideoReader::open(video_path)?;
    extract_frames(&mut reader, output_dir, options)
}

/// Drain `source` into `output_dir`.
///
/// Writes the metadata record first, then `frame_00000.<ext>`,
/// `frame_00001.<ext>`, ... When the source reports a positive frame count,
/// no more than that many frames are written. A source that ends early is not
/// an error.
///
/// # Errors
///
/// Returns [`ReframeError::FrameNumberOverflow`] before anything is written
/// when the reported count exceeds [`MAX_FRAME_FILES`]. Sources with an
/// unknown count fail the same way once they reach that many frames.
pub fn extract_frames<S: FrameSource>(
    source: &mut S,
    output_dir: &Path,
    options: &ConversionOptions,
) -> Result<ExtractionSummary, ReframeError> {
    let reported_frames = source.reported_frame_count();
    if reported_frames > MAX_FRAME_FILES {
        return Err(ReframeError::FrameNumberOverflow {
            frame_number: reported_frames - 1,
        });
    }

    fs::create_dir_all(output_dir)?;
    let metadata = FrameMetadata::new(source.frame_rate(), reported_frames);
    metadata.write_to(output_dir)?;

    let frame_limit = (reported_frames > 0).then_some(reported_frames);
    let format = options.image_format;
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::FrameExtraction,
        frame_limit,
        options.batch_size,
    );

    let mut frames_written: u64 = 0;
    while frame_limit.is_none_or(|limit| frames_written < limit) {
        let Some(frame) = source.next_frame()? else {
            break;
        };

        let frame_path = output_dir.join(frame_files::frame_file_name(frames_written, format)?);
        frame.save_with_format(&frame_path, format.to_image_format())?;
        tracker.advance(frames_written);
        frames_written += 1;
    }
    tracker.finish();

    if frames_written < reported_frames {
        log::info!(
            "Stream ended after {frames_written} of {reported_frames} reported frame(s)"
        );
    }
    log::info!(
        "Extracted {frames_written} frame(s) to {}",
        output_dir.display()
    );

    Ok(ExtractionSummary {
        output_dir: output_dir.to_path_buf(),
        metadata,
        frames_written,
    })
}
