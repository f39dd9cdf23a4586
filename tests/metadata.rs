//! Metadata record integration tests.

use std::fs;

use reframe::{FrameMetadata, METADATA_FILE_NAME, ReframeError};

#[test]
fn text_uses_the_documented_line_format() {
    let metadata = FrameMetadata::new(30.0, 120);
    assert_eq!(
        metadata.to_string(),
        "Original Frame Rate: 30.0 FPS\nTotal Frames: 120\n"
    );
}

#[test]
fn fractional_rate_survives_a_write_and_read() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let rate = 30_000.0 / 1_001.0;

    let path = FrameMetadata::new(rate, 7).write_to(directory.path()).unwrap();
    assert_eq!(path, directory.path().join(METADATA_FILE_NAME));

    let metadata = FrameMetadata::read_from(directory.path()).unwrap();
    assert_eq!(metadata.frames_per_second, rate);
    assert_eq!(metadata.total_frames, Some(7));
}

#[test]
fn parse_tolerates_extra_lines_and_missing_total() {
    let metadata: FrameMetadata = "# edited by hand\nOriginal Frame Rate:   24.5   FPS\n"
        .parse()
        .unwrap();
    assert_eq!(metadata.frames_per_second, 24.5);
    assert_eq!(metadata.total_frames, None);
}

#[test]
fn parse_accepts_integer_rate() {
    let metadata: FrameMetadata = "Original Frame Rate: 60 FPS\nTotal Frames: 3\n"
        .parse()
        .unwrap();
    assert_eq!(metadata.frames_per_second, 60.0);
}

#[test]
fn parse_rejects_missing_rate_line() {
    let result = "Total Frames: 10\n".parse::<FrameMetadata>();
    assert!(result.is_err());
}

#[test]
fn parse_rejects_non_numeric_rate() {
    let result = "Original Frame Rate: fast FPS\n".parse::<FrameMetadata>();
    let reason = result.unwrap_err();
    assert!(reason.contains("fast"), "reason should quote the value: {reason}");
}

#[test]
fn read_from_missing_file() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    match FrameMetadata::read_from(directory.path()) {
        Err(ReframeError::MissingMetadata { path }) => {
            assert_eq!(path, directory.path().join(METADATA_FILE_NAME));
        }
        other => panic!("Expected MissingMetadata, got: {other:?}"),
    }
}

#[test]
fn read_from_malformed_file() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(directory.path().join(METADATA_FILE_NAME), "Total Frames: 4\n").unwrap();

    let error = FrameMetadata::read_from(directory.path()).unwrap_err();
    assert!(matches!(error, ReframeError::MalformedMetadata { .. }));
    assert!(
        error
            .to_string()
            .to_lowercase()
            .contains("metadata does not contain frame rate information"),
        "unexpected message: {error}"
    );
}
