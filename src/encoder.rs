//! Video encoding.
//!
//! [`VideoWriter`] streams [`DynamicImage`] frames into a video container
//! using MPEG-4 Part 2 (the `mp4v` codec). The container format is inferred
//! from the output file extension. It is the [`FrameSink`] used by
//! [`frames_to_video`](crate::frames_to_video).
//!
//! # Example
//!
//! ```no_run
//! use image::{DynamicImage, Rgb, RgbImage};
//! use reframe::{EncoderSettings, FrameSink, ReframeError, VideoWriter};
//!
//! let settings = EncoderSettings::new(24.0, 320, 240)?;
//! let mut writer = VideoWriter::create("output.mp4", &settings)?;
//! for shade in [0u8, 128, 255] {
//!     let frame = RgbImage::from_pixel(320, 240, Rgb([shade, shade, shade]));
//!     writer.write_frame(&DynamicImage::ImageRgb8(frame))?;
//! }
//! writer.finish()?;
//! # Ok::<(), ReframeError>(())
//! ```

use std::path::{Path, PathBuf};

use ffmpeg_next::{
    Packet, Rational,
    codec::{Id, context::Context as CodecContext, encoder::video::Encoder as OpenedEncoder},
    format::{Flags as FormatFlags, Pixel, context::Output},
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::DynamicImage;
use image::imageops::FilterType;

use crate::{conversion, error::ReframeError, frame_io::FrameSink};

/// The fixed output codec.
pub const OUTPUT_CODEC: Id = Id::MPEG4;

/// Pixel format fed to the encoder.
const ENCODER_PIXEL_FORMAT: Pixel = Pixel::YUV420P;

/// Largest time-base denominator MPEG-4 Part 2 accepts.
const MAX_TIME_BASE_DENOMINATOR: i32 = 65_535;

/// Frame rate and dimensions of the video to encode.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct EncoderSettings {
    /// Output frames per second.
    pub frames_per_second: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl EncoderSettings {
    /// Validate and build encoder settings.
    ///
    /// # Errors
    ///
    /// - [`ReframeError::InvalidFrameRate`] if `frames_per_second` is not a
    ///   finite positive number.
    /// - [`ReframeError::VideoEncodeError`] if either dimension is zero.
    pub fn new(frames_per_second: f64, width: u32, height: u32) -> Result<Self, ReframeError> {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(ReframeError::InvalidFrameRate(frames_per_second));
        }
        if width == 0 || height == 0 {
            return Err(ReframeError::VideoEncodeError(format!(
                "invalid output dimensions {width}x{height}"
            )));
        }
        Ok(Self {
            frames_per_second,
            width,
            height,
        })
    }

    /// The frame rate as a rational FFmpeg can store in the stream.
    pub fn frame_rate(&self) -> Rational {
        unsafe {
            ffmpeg_sys_next::av_d2q(self.frames_per_second, MAX_TIME_BASE_DENOMINATOR)
        }
        .into()
    }
}

/// Encodes frames into a video file one at a time.
///
/// Frames whose size differs from the configured output size are resized.
/// Call [`finish`](FrameSink::finish) to flush the encoder and write the
/// container trailer; a writer dropped without `finish` does the same on a
/// best-effort basis so the file is never left without a trailer.
pub struct VideoWriter {
    output: Output,
    encoder: OpenedEncoder,
    scaler: ScalingContext,
    stream_index: usize,
    encoder_time_base: Rational,
    stream_time_base: Rational,
    width: u32,
    height: u32,
    frames_written: u64,
    finished: bool,
    path: PathBuf,
}

impl VideoWriter {
    /// Create the output file and write its header.
    ///
    /// # Errors
    ///
    /// - [`ReframeError::VideoWriteError`] if the output cannot be created.
    /// - [`ReframeError::VideoEncodeError`] if the codec is unavailable or
    ///   rejects the settings.
    pub fn create<P: AsRef<Path>>(
        path: P,
        settings: &EncoderSettings,
    ) -> Result<Self, ReframeError> {
        let path = path.as_ref();
        let (width, height) = (settings.width, settings.height);
        let frame_rate = settings.frame_rate();
        let encoder_time_base = frame_rate.invert();

        log::info!(
            "Encoding {}x{} @ {} fps ({frame_rate:?}) to {}",
            width,
            height,
            settings.frames_per_second,
            path.display(),
        );

        ffmpeg_next::init()
            .map_err(|e| ReframeError::VideoEncodeError(format!("FFmpeg initialisation failed: {e}")))?;

        let mut output = ffmpeg_next::format::output(path)
            .map_err(|e| ReframeError::VideoWriteError(format!("cannot open output: {e}")))?;

        let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);

        let encoder_codec = ffmpeg_next::encoder::find(OUTPUT_CODEC).ok_or_else(|| {
            ReframeError::VideoEncodeError(format!("codec {OUTPUT_CODEC:?} not available"))
        })?;

        let mut stream = output
            .add_stream(encoder_codec)
            .map_err(|e| ReframeError::VideoWriteError(format!("cannot add stream: {e}")))?;
        let stream_index = stream.index();

        let mut encoder = CodecContext::from_parameters(stream.parameters())
            .map_err(|e| {
                ReframeError::VideoEncodeError(format!("cannot create codec context: {e}"))
            })?
            .encoder()
            .video()
            .map_err(|e| {
                ReframeError::VideoEncodeError(format!("cannot create video encoder: {e}"))
            })?;

        encoder.set_width(width);
        encoder.set_height(height);
        encoder.set_format(ENCODER_PIXEL_FORMAT);
        encoder.set_time_base(encoder_time_base);
        encoder.set_frame_rate(Some(frame_rate));

        if needs_global_header {
            unsafe {
                (*encoder.as_mut_ptr()).flags |=
                    ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
            }
        }

        let encoder = encoder
            .open_as(encoder_codec)
            .map_err(|e| ReframeError::VideoEncodeError(format!("cannot open encoder: {e}")))?;

        stream.set_parameters(&encoder);
        stream.set_time_base(encoder_time_base);
        stream.set_avg_frame_rate(frame_rate);

        output
            .write_header()
            .map_err(|e| ReframeError::VideoWriteError(format!("cannot write header: {e}")))?;

        // The muxer may pick its own stream time base while writing the header.
        let stream_time_base = output
            .stream(stream_index)
            .map(|stream| stream.time_base())
            .ok_or_else(|| {
                ReframeError::VideoWriteError("output stream vanished after header".to_string())
            })?;

        let scaler = ScalingContext::get(
            Pixel::RGB24,
            width,
            height,
            ENCODER_PIXEL_FORMAT,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|e| ReframeError::VideoWriteError(format!("cannot create scaler: {e}")))?;

        Ok(Self {
            output,
            encoder,
            scaler,
            stream_index,
            encoder_time_base,
            stream_time_base,
            width,
            height,
            frames_written: 0,
            finished: false,
            path: path.to_path_buf(),
        })
    }

    /// Number of frames handed to the encoder so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Mux every packet the encoder has ready.
    fn drain_packets(&mut self) -> Result<(), ReframeError> {
        let mut packet = Packet::empty();
        while self.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(self.stream_index);
            packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
            packet
                .write_interleaved(&mut self.output)
                .map_err(|e| ReframeError::VideoWriteError(format!("write packet failed: {e}")))?;
        }
        Ok(())
    }

    /// Flush the encoder and write the trailer. Runs at most once.
    fn finalize(&mut self) -> Result<(), ReframeError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        self.encoder
            .send_eof()
            .map_err(|e| ReframeError::VideoEncodeError(format!("send_eof failed: {e}")))?;
        self.drain_packets()?;

        self.output
            .write_trailer()
            .map_err(|e| ReframeError::VideoWriteError(format!("cannot write trailer: {e}")))?;

        log::info!(
            "Finished {} ({} frame(s))",
            self.path.display(),
            self.frames_written
        );
        Ok(())
    }
}

impl FrameSink for VideoWriter {
    fn write_frame(&mut self, frame: &DynamicImage) -> Result<(), ReframeError> {
        if self.finished {
            return Err(ReframeError::VideoWriteError(
                "writer has already been finished".to_string(),
            ));
        }

        let rgb = if frame.width() != self.width || frame.height() != self.height {
            log::warn!(
                "Resizing {}x{} frame to {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height,
            );
            frame
                .resize_exact(self.width, self.height, FilterType::Lanczos3)
                .to_rgb8()
        } else {
            frame.to_rgb8()
        };

        let source_frame = conversion::rgb_image_to_frame(&rgb);
        let mut encoded_frame = VideoFrame::empty();
        self.scaler
            .run(&source_frame, &mut encoded_frame)
            .map_err(|e| ReframeError::VideoWriteError(format!("scaling failed: {e}")))?;
        encoded_frame.set_pts(Some(self.frames_written as i64));

        self.encoder
            .send_frame(&encoded_frame)
            .map_err(|e| ReframeError::VideoEncodeError(format!("send_frame failed: {e}")))?;
        self.frames_written += 1;

        self.drain_packets()
    }

    fn finish(mut self) -> Result<u64, ReframeError> {
        self.finalize()?;
        Ok(self.frames_written)
    }
}

impl Drop for VideoWriter {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::debug!("Finalizing unfinished writer for {}", self.path.display());
        if let Err(error) = self.finalize() {
            log::warn!("Failed to finalize {}: {error}", self.path.display());
        }
    }
}
