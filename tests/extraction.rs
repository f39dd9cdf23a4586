//! Frame extraction tests against in-memory frame sources.

use std::{collections::VecDeque, fs, path::Path};

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use reframe::{
    ConversionOptions, FrameImageFormat, FrameMetadata, FrameSource, MAX_FRAME_FILES,
    ReframeError, extract_frames,
};

/// A source that yields a fixed list of frames and advertises `reported` frames.
struct ScriptedSource {
    frames: VecDeque<DynamicImage>,
    fps: f64,
    reported: u64,
}

impl ScriptedSource {
    fn solid(count: usize, reported: u64, fps: f64) -> Self {
        let frames = (0..count)
            .map(|index| {
                let shade = (index * 40 % 256) as u8;
                DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([shade, shade, shade])))
            })
            .collect();
        Self {
            frames,
            fps,
            reported,
        }
    }
}

impl FrameSource for ScriptedSource {
    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn reported_frame_count(&self) -> u64 {
        self.reported
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, ReframeError> {
        Ok(self.frames.pop_front())
    }
}

fn frame_names(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(directory)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.starts_with("frame_"))
        .collect();
    names.sort();
    names
}

#[test]
fn writes_metadata_and_one_file_per_frame() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = ScriptedSource::solid(4, 4, 25.0);

    let summary = extract_frames(&mut source, directory.path(), &ConversionOptions::new()).unwrap();

    assert_eq!(summary.frames_written, 4);
    assert_eq!(summary.metadata, FrameMetadata::new(25.0, 4));
    assert_eq!(
        frame_names(directory.path()),
        ["frame_00000.png", "frame_00001.png", "frame_00002.png", "frame_00003.png"]
    );
    assert_eq!(
        fs::read_to_string(directory.path().join("metadata.txt")).unwrap(),
        "Original Frame Rate: 25.0 FPS\nTotal Frames: 4\n"
    );
}

#[test]
fn saved_frames_keep_their_pixels_and_order() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = ScriptedSource::solid(3, 3, 10.0);

    extract_frames(&mut source, directory.path(), &ConversionOptions::new()).unwrap();

    for (index, name) in frame_names(directory.path()).iter().enumerate() {
        let image = image::open(directory.path().join(name)).unwrap();
        assert_eq!(image.dimensions(), (8, 6));
        let expected = (index * 40) as u8;
        assert_eq!(image.to_rgb8().get_pixel(0, 0), &Rgb([expected, expected, expected]));
    }
}

#[test]
fn early_end_of_stream_is_not_an_error() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = ScriptedSource::solid(2, 10, 30.0);

    let summary = extract_frames(&mut source, directory.path(), &ConversionOptions::new()).unwrap();

    assert_eq!(summary.frames_written, 2);
    assert_eq!(summary.metadata.total_frames, Some(10));
    assert_eq!(frame_names(directory.path()).len(), 2);
}

#[test]
fn never_writes_more_than_the_reported_count() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = ScriptedSource::solid(6, 4, 30.0);

    let summary = extract_frames(&mut source, directory.path(), &ConversionOptions::new()).unwrap();

    assert_eq!(summary.frames_written, 4);
    assert_eq!(frame_names(directory.path()).len(), 4);
}

#[test]
fn unknown_reported_count_reads_to_end_of_stream() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = ScriptedSource::solid(5, 0, 12.0);

    let summary = extract_frames(&mut source, directory.path(), &ConversionOptions::new()).unwrap();

    assert_eq!(summary.frames_written, 5);
}

#[test]
fn zero_frame_source_writes_only_metadata() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = ScriptedSource::solid(0, 0, 24.0);

    let summary = extract_frames(&mut source, directory.path(), &ConversionOptions::new()).unwrap();

    assert_eq!(summary.frames_written, 0);
    assert!(frame_names(directory.path()).is_empty());
    let metadata = FrameMetadata::read_from(directory.path()).unwrap();
    assert_eq!(metadata.frames_per_second, 24.0);
    assert_eq!(metadata.total_frames, Some(0));
}

#[test]
fn creates_missing_output_directories() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let nested = directory.path().join("a").join("b");
    let mut source = ScriptedSource::solid(1, 1, 30.0);

    extract_frames(&mut source, &nested, &ConversionOptions::new()).unwrap();

    assert!(nested.join("metadata.txt").is_file());
    assert!(nested.join("frame_00000.png").is_file());
}

#[test]
fn rerunning_into_the_same_directory_is_idempotent() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");

    let mut first = ScriptedSource::solid(3, 3, 30.0);
    extract_frames(&mut first, directory.path(), &ConversionOptions::new()).unwrap();
    let first_names = frame_names(directory.path());
    let first_bytes: Vec<Vec<u8>> = first_names
        .iter()
        .map(|name| fs::read(directory.path().join(name)).unwrap())
        .collect();

    let mut second = ScriptedSource::solid(3, 3, 30.0);
    extract_frames(&mut second, directory.path(), &ConversionOptions::new()).unwrap();
    let second_names = frame_names(directory.path());
    let second_bytes: Vec<Vec<u8>> = second_names
        .iter()
        .map(|name| fs::read(directory.path().join(name)).unwrap())
        .collect();

    assert_eq!(first_names, second_names);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn jpeg_frames_use_the_jpg_extension() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = ScriptedSource::solid(2, 2, 30.0);
    let options = ConversionOptions::new().with_image_format(FrameImageFormat::Jpeg);

    extract_frames(&mut source, directory.path(), &options).unwrap();

    assert_eq!(
        frame_names(directory.path()),
        ["frame_00000.jpg", "frame_00001.jpg"]
    );
}

#[test]
fn source_errors_propagate() {
    struct FailingSource;

    impl FrameSource for FailingSource {
        fn frame_rate(&self) -> f64 {
            30.0
        }

        fn reported_frame_count(&self) -> u64 {
            3
        }

        fn next_frame(&mut self) -> Result<Option<DynamicImage>, ReframeError> {
            Err(ReframeError::VideoDecodeError("corrupt".to_string()))
        }
    }

    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let result = extract_frames(&mut FailingSource, directory.path(), &ConversionOptions::new());

    assert!(matches!(result, Err(ReframeError::VideoDecodeError(_))));
    assert!(directory.path().join("metadata.txt").is_file());
}

#[test]
fn oversized_reported_count_fails_before_writing() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = directory.path().join("frames");
    let mut source = ScriptedSource::solid(3, MAX_FRAME_FILES + 1, 30.0);

    let result = extract_frames(&mut source, &output, &ConversionOptions::new());

    assert!(matches!(
        result,
        Err(ReframeError::FrameNumberOverflow { frame_number }) if frame_number == MAX_FRAME_FILES
    ));
    assert!(!output.exists());
    assert_eq!(source.frames.len(), 3, "no frame should have been decoded");
}

#[test]
fn largest_nameable_reported_count_is_accepted() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = ScriptedSource::solid(2, MAX_FRAME_FILES, 30.0);

    let summary = extract_frames(&mut source, directory.path(), &ConversionOptions::new()).unwrap();

    assert_eq!(summary.frames_written, 2);
    assert_eq!(frame_names(directory.path()).len(), 2);
}
