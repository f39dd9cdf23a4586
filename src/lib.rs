//! # reframe
//!
//! Split a video into a directory of numbered still frames, and reassemble
//! such a directory into a playable video.
//!
//! Extraction writes `metadata.txt` (the source frame rate and frame count)
//! next to `frame_00000.png`, `frame_00001.png`, ... Assembly reads the frame
//! rate back, encodes the frames in file-name order and sizes the output
//! after the first frame. In between, the frames can be edited by any tool
//! that keeps their names. Decoding and encoding are done by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reframe::ReframeError;
//!
//! let extracted = reframe::video_to_frames("input.mp4", "frames")?;
//! println!("{} frames at {} fps", extracted.frames_written, extracted.metadata.frames_per_second);
//!
//! // ... edit frames/frame_*.png ...
//!
//! reframe::frames_to_video("frames", "output.mp4")?;
//! # Ok::<(), ReframeError>(())
//! ```
//!
//! ## Custom sources and sinks
//!
//! [`extract_frames`] and [`assemble_frames`] accept any [`FrameSource`] /
//! [`FrameSink`], so the directory bookkeeping can be reused with other
//! decoders and encoders.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod assemble;
pub mod configuration;
mod conversion;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod ffmpeg;
pub mod frame_files;
pub mod frame_io;
pub mod metadata;
pub mod progress;

pub use assemble::{
    AssemblySummary, assemble_frames, frames_to_video, frames_to_video_with_options,
};
pub use configuration::ConversionOptions;
pub use decoder::{VideoProperties, VideoReader};
pub use encoder::{EncoderSettings, OUTPUT_CODEC, VideoWriter};
pub use error::ReframeError;
pub use extract::{ExtractionSummary, extract_frames, video_to_frames, video_to_frames_with_options};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use frame_files::{
    FRAME_FILE_PREFIX, FRAME_NUMBER_WIDTH, FrameImageFormat, MAX_FRAME_FILES, frame_file_name,
    is_frame_file_name, list_frame_files,
};
pub use frame_io::{FrameSink, FrameSource};
pub use metadata::{FrameMetadata, METADATA_FILE_NAME};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
