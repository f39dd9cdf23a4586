//! Pixel buffer copies between FFmpeg frames and `image` buffers.
//!
//! FFmpeg frames frequently carry per-row padding (stride > width × 3), while
//! `image` buffers are tightly packed. Both directions copy row by row unless
//! the strides already agree.

use ffmpeg_next::{format::Pixel, frame::Video as VideoFrame};
use image::{DynamicImage, RgbImage};

use crate::error::ReframeError;

const RGB_BYTES_PER_PIXEL: usize = 3;

/// Copy an RGB24 FFmpeg frame into a [`DynamicImage::ImageRgb8`].
pub(crate) fn rgb_frame_to_image(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<DynamicImage, ReframeError> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * RGB_BYTES_PER_PIXEL;
    let data = video_frame.data(0);

    let buffer = if stride == row_length {
        data[..row_length * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_length * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_length]);
        }
        buffer
    };

    RgbImage::from_raw(width, height, buffer)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| {
            ReframeError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
}

/// Copy a packed RGB image into a freshly allocated RGB24 FFmpeg frame.
pub(crate) fn rgb_image_to_frame(image: &RgbImage) -> VideoFrame {
    let (width, height) = image.dimensions();
    let mut video_frame = VideoFrame::new(Pixel::RGB24, width, height);
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * RGB_BYTES_PER_PIXEL;
    let source = image.as_raw();
    let destination = video_frame.data_mut(0);

    for row in 0..(height as usize) {
        let source_start = row * row_length;
        let destination_start = row * stride;
        destination[destination_start..destination_start + row_length]
            .copy_from_slice(&source[source_start..source_start + row_length]);
    }

    video_frame
}
