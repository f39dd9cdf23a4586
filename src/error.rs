//! Error types for the `reframe` crate.
//!
//! This module defines [`ReframeError`], the unified error type returned by
//! every fallible operation in the crate. Variants carry the paths involved
//! so a failure can be diagnosed from its message alone.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `reframe` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReframeError {
    /// The video file could not be opened or holds no decodable video stream.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoReader::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The frames directory handed to the assembler does not exist.
    #[error("Frames directory does not exist: {path}")]
    MissingDirectory {
        /// The directory that was expected.
        path: PathBuf,
    },

    /// The frames directory has no `metadata.txt`.
    #[error("Metadata file not found in the frames directory: {path}")]
    MissingMetadata {
        /// The metadata path that was probed.
        path: PathBuf,
    },

    /// `metadata.txt` exists but its frame-rate line is absent or unreadable.
    #[error("Metadata does not contain frame rate information ({path}): {reason}")]
    MalformedMetadata {
        /// The metadata file that was read.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// No file in the directory matches the frame naming pattern.
    #[error("No frame files matching frame_*.{extension} found in {directory}")]
    NoFrameFiles {
        /// The directory that was listed.
        directory: PathBuf,
        /// The image extension that was looked for.
        extension: String,
    },

    /// The frame rate cannot drive an encoder (zero, negative, NaN or infinite).
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// The frame number no longer fits the fixed-width file name.
    #[error("Frame {frame_number} exceeds the 5-digit frame file numbering")]
    FrameNumberOverflow {
        /// The frame number that could not be named.
        frame_number: u64,
    },

    /// A video frame could not be decoded or converted.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The encoder could not be found, configured or fed.
    #[error("Video encoding error: {0}")]
    VideoEncodeError(String),

    /// The output container could not be written.
    #[error("Video write error: {0}")]
    VideoWriteError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while loading or saving a frame.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for ReframeError {
    fn from(error: FfmpegError) -> Self {
        ReframeError::FfmpegError(error.to_string())
    }
}
