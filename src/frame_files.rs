//! Frame file naming and discovery.
//!
//! Extracted frames are named `frame_00000.png`, `frame_00001.png`, and so on.
//! The fixed-width ordinal makes lexicographic file-name order equal to
//! temporal order, which is what the assembler relies on when it sorts a
//! directory listing.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use image::ImageFormat;

use crate::error::ReframeError;

/// Prefix shared by every frame file name.
pub const FRAME_FILE_PREFIX: &str = "frame_";

/// Number of digits in the zero-padded frame ordinal.
pub const FRAME_NUMBER_WIDTH: usize = 5;

/// Number of frames the fixed-width naming can represent (`00000`–`99999`).
pub const MAX_FRAME_FILES: u64 = 100_000;

/// Image format used for frame files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameImageFormat {
    /// Lossless PNG. This is the default.
    #[default]
    Png,
    /// JPEG, written with the `jpg` extension.
    Jpeg,
    /// Uncompressed BMP.
    Bmp,
    /// TIFF.
    Tiff,
}

impl FrameImageFormat {
    /// File extension (without the dot) used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            FrameImageFormat::Png => "png",
            FrameImageFormat::Jpeg => "jpg",
            FrameImageFormat::Bmp => "bmp",
            FrameImageFormat::Tiff => "tiff",
        }
    }

    pub(crate) fn to_image_format(self) -> ImageFormat {
        match self {
            FrameImageFormat::Png => ImageFormat::Png,
            FrameImageFormat::Jpeg => ImageFormat::Jpeg,
            FrameImageFormat::Bmp => ImageFormat::Bmp,
            FrameImageFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

impl Display for FrameImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

impl FromStr for FrameImageFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(FrameImageFormat::Png),
            "jpg" | "jpeg" => Ok(FrameImageFormat::Jpeg),
            "bmp" => Ok(FrameImageFormat::Bmp),
            "tif" | "tiff" => Ok(FrameImageFormat::Tiff),
            other => Err(format!("unsupported frame image format: {other}")),
        }
    }
}

/// Build the file name for a frame ordinal, e.g. `frame_00042.png`.
///
/// # Errors
///
/// Returns [`ReframeError::FrameNumberOverflow`] when `frame_number` needs
/// more than [`FRAME_NUMBER_WIDTH`] digits.
///
/// # Example
///
/// ```
/// use reframe::{FrameImageFormat, frame_file_name};
///
/// assert_eq!(frame_file_name(42, FrameImageFormat::Png).unwrap(), "frame_00042.png");
/// ```
pub fn frame_file_name(
    frame_number: u64,
    format: FrameImageFormat,
) -> Result<String, ReframeError> {
    if frame_number >= MAX_FRAME_FILES {
        return Err(ReframeError::FrameNumberOverflow { frame_number });
    }
    Ok(format!(
        "{FRAME_FILE_PREFIX}{frame_number:0width$}.{}",
        format.extension(),
        width = FRAME_NUMBER_WIDTH,
    ))
}

/// Returns `true` if `file_name` has the frame prefix and the format's extension.
pub fn is_frame_file_name(file_name: &str, format: FrameImageFormat) -> bool {
    file_name
        .strip_prefix(FRAME_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(format.extension()))
        .is_some_and(|stem| stem.ends_with('.'))
}

/// List the frame files in `directory`, sorted by file name.
///
/// Only regular files (or symlinks to them) whose names match [`is_frame_file_name`] are returned.
/// Names that are not valid UTF-8 are ignored.
pub fn list_frame_files<P: AsRef<Path>>(
    directory: P,
    format: FrameImageFormat,
) -> Result<Vec<PathBuf>, ReframeError> {
    let directory = directory.as_ref();
    let mut named: Vec<(String, PathBuf)> = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        // Follows symlinks. Broken links and directories are skipped.
        if !entry.path().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if is_frame_file_name(&file_name, format) {
            named.push((file_name, entry.path()));
        }
    }

    named.sort_by(|(left, _), (right, _)| left.cmp(right));
    log::debug!(
        "Found {} frame file(s) in {}",
        named.len(),
        directory.display()
    );

    Ok(named.into_iter().map(|(_, path)| path).collect())
}
