//! Sequential video decoding.
//!
//! [`VideoReader`] opens a video file, caches its [`VideoProperties`], and
//! decodes frames one at a time into RGB8 [`DynamicImage`] values. It is the
//! [`FrameSource`] used by [`video_to_frames`](crate::video_to_frames).
//!
//! # Example
//!
//! ```no_run
//! use reframe::{FrameSource, ReframeError, VideoReader};
//!
//! let mut reader = VideoReader::open("input.mp4")?;
//! println!("{:.2} fps", reader.properties().frames_per_second);
//!
//! while let Some(frame) = reader.next_frame()? {
//!     println!("{}x{}", frame.width(), frame.height());
//! }
//! # Ok::<(), ReframeError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::DynamicImage;

use crate::{conversion, error::ReframeError, frame_io::FrameSource};

/// Properties of the video stream read at open time.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoProperties {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Average frames per second (0.0 when the container does not say).
    pub frames_per_second: f64,
    /// Frame count advertised by the container. May be approximate.
    pub frame_count: u64,
    /// Stream duration, or the container duration when the stream has none.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"mpeg4"`).
    pub codec: String,
}

/// Decodes the best video stream of a file front to back.
///
/// The demuxer, decoder and scaler are owned by the reader and released
/// when it is dropped.
pub struct VideoReader {
    input_context: Input,
    decoder: VideoDecoder,
    /// RGB converter, keyed by the source format and size it was built for.
    scaler: Option<((Pixel, u32, u32), ScalingContext)>,
    video_stream_index: usize,
    properties: VideoProperties,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
    exhausted: bool,
    file_path: PathBuf,
}

impl Debug for VideoReader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoReader")
            .field("file_path", &self.file_path)
            .field("video_stream_index", &self.video_stream_index)
            .field("properties", &self.properties)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl VideoReader {
    /// Open a video file for sequential decoding.
    ///
    /// Initializes FFmpeg (idempotent), opens the container and prepares a
    /// decoder for its best video stream.
    ///
    /// # Errors
    ///
    /// Returns [`ReframeError::FileOpen`] if the file cannot be opened, has
    /// no video stream, or its video codec cannot be decoded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReframeError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();
        let open_error = |reason: String| ReframeError::FileOpen {
            path: file_path.clone(),
            reason,
        };

        log::debug!("Opening video file: {}", path.display());

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(path).map_err(|error| open_error(error.to_string()))?;

        let (video_stream_index, decoder, properties) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or_else(|| open_error("no video stream found".to_string()))?;

            let decoder_context = CodecContext::from_parameters(stream.parameters())
                .map_err(|error| {
                    open_error(format!("failed to read video codec parameters: {error}"))
                })?;
            let codec = decoder_context.id().name().to_string();
            let decoder = decoder_context
                .decoder()
                .video()
                .map_err(|error| open_error(format!("failed to create video decoder: {error}")))?;

            let frames_per_second = rational_to_f64(stream.avg_frame_rate())
                .or_else(|| rational_to_f64(stream.rate()))
                .unwrap_or(0.0);

            let duration = match stream_duration(stream.duration(), stream.time_base()) {
                Some(duration) => duration,
                None if input_context.duration() > 0 => {
                    Duration::from_micros(input_context.duration() as u64)
                }
                None => Duration::ZERO,
            };

            let frame_count = if stream.frames() > 0 {
                stream.frames() as u64
            } else {
                (duration.as_secs_f64() * frames_per_second).round() as u64
            };

            let properties = VideoProperties {
                width: decoder.width(),
                height: decoder.height(),
                frames_per_second,
                frame_count,
                duration,
                codec,
            };
            (stream.index(), decoder, properties)
        };

        log::debug!(
            "Video stream {video_stream_index}: {}x{} @ {:.3} fps, ~{} frames [{}]",
            properties.width,
            properties.height,
            properties.frames_per_second,
            properties.frame_count,
            properties.codec,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler: None,
            video_stream_index,
            properties,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
            exhausted: false,
            file_path,
        })
    }

    /// Properties cached when the file was opened.
    pub fn properties(&self) -> &VideoProperties {
        &self.properties
    }

    /// Path the reader was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Convert `decoded_frame` to RGB and copy it out as an image.
    fn convert_decoded_frame(&mut self) -> Result<DynamicImage, ReframeError> {
        let width = self.decoded_frame.width();
        let height = self.decoded_frame.height();
        let key = (self.decoded_frame.format(), width, height);

        let stale = !matches!(&self.scaler, Some((current, _)) if *current == key);
        if stale {
            let scaler = ScalingContext::get(
                key.0,
                width,
                height,
                Pixel::RGB24,
                width,
                height,
                ScalingFlags::BILINEAR,
            )
            .map_err(|error| {
                ReframeError::VideoDecodeError(format!(
                    "cannot convert {:?} {width}x{height} frames to RGB: {error}",
                    key.0
                ))
            })?;
            self.scaler = Some((key, scaler));
            self.rgb_frame = VideoFrame::empty();
        }

        if let Some((_, scaler)) = self.scaler.as_mut() {
            scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
        }

        conversion::rgb_frame_to_image(&self.rgb_frame, width, height)
    }
}

impl FrameSource for VideoReader {
    fn frame_rate(&self) -> f64 {
        self.properties.frames_per_second
    }

    fn reported_frame_count(&self) -> u64 {
        self.properties.frame_count
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, ReframeError> {
        if self.exhausted {
            return Ok(None);
        }

        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return self.convert_decoded_frame().map(Some);
            }

            if self.eof_sent {
                self.exhausted = true;
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() != self.video_stream_index {
                        continue;
                    }
                    if let Err(error) = self.decoder.send_packet(&packet) {
                        log::warn!(
                            "Skipping undecodable packet in {}: {error}",
                            self.file_path.display()
                        );
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(error) => {
                    log::warn!(
                        "Read error in {}, treating as end of stream: {error}",
                        self.file_path.display()
                    );
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
            }
        }
    }
}

fn rational_to_f64(rational: Rational) -> Option<f64> {
    if rational.numerator() > 0 && rational.denominator() > 0 {
        Some(rational.numerator() as f64 / rational.denominator() as f64)
    } else {
        None
    }
}

/// Stream duration in seconds, or `None` when unset or out of range.
fn stream_duration(ticks: i64, time_base: Rational) -> Option<Duration> {
    if ticks <= 0 {
        return None;
    }
    let seconds = ticks as f64 * rational_to_f64(time_base)?;
    Duration::try_from_secs_f64(seconds).ok()
}
