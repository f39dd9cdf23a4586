//! The metadata record shared between extraction and assembly.
//!
//! Extraction writes a small `metadata.txt` next to the frames it produces:
//!
//! ```text
//! Original Frame Rate: 29.97002997002997 FPS
//! Total Frames: 300
//! ```
//!
//! Assembly reads it back to recover the frame rate. Only the frame-rate line
//! is required on read; the frame count is informational.
//!
//! # Example
//!
//! ```
//! use reframe::FrameMetadata;
//!
//! let metadata: FrameMetadata = "Original Frame Rate: 25.0 FPS\nTotal Frames: 50\n"
//!     .parse()
//!     .unwrap();
//! assert_eq!(metadata.frames_per_second, 25.0);
//! assert_eq!(metadata.total_frames, Some(50));
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::ReframeError;

/// File name of the metadata record inside a frames directory.
pub const METADATA_FILE_NAME: &str = "metadata.txt";

const FRAME_RATE_PREFIX: &str = "Original Frame Rate:";
const TOTAL_FRAMES_PREFIX: &str = "Total Frames:";

/// Timing information persisted alongside extracted frames.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct FrameMetadata {
    /// Frame rate of the source video, in frames per second.
    pub frames_per_second: f64,
    /// Frame count reported by the source container, if recorded.
    pub total_frames: Option<u64>,
}

impl FrameMetadata {
    /// Create a record from a frame rate and a reported frame count.
    pub fn new(frames_per_second: f64, total_frames: u64) -> Self {
        Self {
            frames_per_second,
            total_frames: Some(total_frames),
        }
    }

    /// Path of the metadata file inside `directory`.
    pub fn path_in<P: AsRef<Path>>(directory: P) -> PathBuf {
        directory.as_ref().join(METADATA_FILE_NAME)
    }

    /// Write the record to `metadata.txt` inside `directory`, replacing any
    /// existing file. Returns the path written.
    pub fn write_to<P: AsRef<Path>>(&self, directory: P) -> Result<PathBuf, ReframeError> {
        let path = Self::path_in(directory);
        fs::write(&path, self.to_string())?;
        log::debug!("Wrote frame metadata to {}", path.display());
        Ok(path)
    }

    /// Read the record from `metadata.txt` inside `directory`.
    ///
    /// # Errors
    ///
    /// - [`ReframeError::MissingMetadata`] if the file does not exist.
    /// - [`ReframeError::MalformedMetadata`] if the frame-rate line is
    ///   missing or its value is not a number.
    pub fn read_from<P: AsRef<Path>>(directory: P) -> Result<Self, ReframeError> {
        let path = Self::path_in(directory);
        if !path.is_file() {
            return Err(ReframeError::MissingMetadata { path });
        }

        let text = fs::read_to_string(&path)?;
        text.parse()
            .map_err(|reason| ReframeError::MalformedMetadata { path, reason })
    }
}

impl Display for FrameMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // `{:?}` keeps the decimal point on whole rates ("30.0", not "30").
        writeln!(f, "{FRAME_RATE_PREFIX} {:?} FPS", self.frames_per_second)?;
        if let Some(total_frames) = self.total_frames {
            writeln!(f, "{TOTAL_FRAMES_PREFIX} {total_frames}")?;
        }
        Ok(())
    }
}

impl FromStr for FrameMetadata {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let frames_per_second = text
            .lines()
            .find_map(|line| line.strip_prefix(FRAME_RATE_PREFIX))
            .ok_or_else(|| format!("no line starting with \"{FRAME_RATE_PREFIX}\""))
            .and_then(|value| {
                let token = value.split_whitespace().next().unwrap_or_default();
                token
                    .parse::<f64>()
                    .map_err(|error| format!("cannot parse frame rate {token:?}: {error}"))
            })?;

        let total_frames = text
            .lines()
            .find_map(|line| line.strip_prefix(TOTAL_FRAMES_PREFIX))
            .and_then(|value| value.trim().parse::<u64>().ok());

        Ok(Self {
            frames_per_second,
            total_frames,
        })
    }
}
