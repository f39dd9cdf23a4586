//! Frame directory → video.
//!
//! [`frames_to_video`] reads the frame rate from `metadata.txt`, sorts the
//! frame files by name, sizes the output after the first frame and encodes
//! every frame in order. [`assemble_frames`] runs the same steps against any
//! [`FrameSink`].
//!
//! # Example
//!
//! ```no_run
//! let summary = reframe::frames_to_video("frames", "output.mp4")?;
//! println!(
//!     "{} frames at {} fps, {}x{}",
//!     summary.frames_written, summary.frames_per_second, summary.width, summary.height,
//! );
//! # Ok::<(), reframe::ReframeError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::{
    configuration::ConversionOptions,
    encoder::{EncoderSettings, VideoWriter},
    error::ReframeError,
    frame_files,
    frame_io::FrameSink,
    metadata::FrameMetadata,
    progress::{OperationType, ProgressTracker},
};

/// Outcome of an assembly run.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct AssemblySummary {
    /// The video file that was written, when known.
    pub output_path: Option<PathBuf>,
    /// Number of frames encoded.
    pub frames_written: u64,
    /// Frame rate recovered from the metadata.
    pub frames_per_second: f64,
    /// Output width, taken from the first frame.
    pub width: u32,
    /// Output height, taken from the first frame.
    pub height: u32,
}

/// Encode the PNG frames in `frames_dir` into `output_path`.
///
/// Equivalent to [`frames_to_video_with_options`] with default options.
pub fn frames_to_video<P, Q>(frames_dir: P, output_path: Q) -> Result<AssemblySummary, ReframeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    frames_to_video_with_options(frames_dir, output_path, &ConversionOptions::default())
}

/// Encode the frames in `frames_dir` into `output_path` with a
/// [`VideoWriter`].
///
/// # Errors
///
/// See [`assemble_frames`]; in addition the encoder errors of
/// [`VideoWriter::create`].
pub fn frames_to_video_with_options<P, Q>(
    frames_dir: P,
    output_path: Q,
    options: &ConversionOptions,
) -> Result<AssemblySummary, ReframeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output_path = output_path.as_ref();
    let summary = assemble_frames(frames_dir.as_ref(), options, |settings| {
        VideoWriter::create(output_path, settings)
    })?;

    Ok(AssemblySummary {
        output_path: Some(output_path.to_path_buf()),
        ..summary
    })
}

/// Validate `frames_dir`, then stream its frames into the sink returned by
/// `open_sink`.
///
/// `open_sink` receives the frame rate from the metadata and the first
/// frame's dimensions. The sink is finished on success and dropped on any
/// error after it was opened.
///
/// # Errors
///
/// - [`ReframeError::MissingDirectory`] if `frames_dir` is not a directory.
/// - [`ReframeError::MissingMetadata`] if `metadata.txt` is absent.
/// - [`ReframeError::MalformedMetadata`] if the frame rate cannot be read.
/// - [`ReframeError::NoFrameFiles`] if no file matches the frame pattern.
/// - [`ReframeError::InvalidFrameRate`] if the recorded rate is unusable.
/// - [`ReframeError::ImageError`] if a frame file cannot be decoded.
pub fn assemble_frames<K, F>(
    frames_dir: &Path,
    options: &ConversionOptions,
    open_sink: F,
) -> Result<AssemblySummary, ReframeError>
where
    K: FrameSink,
    F: FnOnce(&EncoderSettings) -> Result<K, ReframeError>,
{
    if !frames_dir.is_dir() {
        return Err(ReframeError::MissingDirectory {
            path: frames_dir.to_path_buf(),
        });
    }

    let metadata = FrameMetadata::read_from(frames_dir)?;
    let format = options.image_format;
    let frame_paths = frame_files::list_frame_files(frames_dir, format)?;

    let Some(first_path) = frame_paths.first() else {
        return Err(ReframeError::NoFrameFiles {
            directory: frames_dir.to_path_buf(),
            extension: format.extension().to_string(),
        });
    };

    let first_frame = image::open(first_path)?;
    let settings = EncoderSettings::new(
        metadata.frames_per_second,
        first_frame.width(),
        first_frame.height(),
    )?;

    log::debug!(
        "Assembling {} frame(s) from {} at {} fps",
        frame_paths.len(),
        frames_dir.display(),
        settings.frames_per_second,
    );

    let mut sink = open_sink(&settings)?;
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::FrameAssembly,
        Some(frame_paths.len() as u64),
        options.batch_size,
    );

    sink.write_frame(&first_frame)?;
    tracker.advance(0);
    drop(first_frame);

    for (frame_number, frame_path) in frame_paths.iter().enumerate().skip(1) {
        let frame = image::open(frame_path)?;
        sink.write_frame(&frame)?;
        tracker.advance(frame_number as u64);
    }

    let frames_written = sink.finish()?;
    tracker.finish();

    Ok(AssemblySummary {
        output_path: None,
        frames_written,
        frames_per_second: settings.frames_per_second,
        width: settings.width,
        height: settings.height,
    })
}
