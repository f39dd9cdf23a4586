//! Frame naming and directory listing tests.

use std::fs;

use reframe::{
    FrameImageFormat, MAX_FRAME_FILES, ReframeError, frame_file_name, is_frame_file_name,
    list_frame_files,
};

#[test]
fn names_are_zero_padded_to_five_digits() {
    assert_eq!(frame_file_name(0, FrameImageFormat::Png).unwrap(), "frame_00000.png");
    assert_eq!(frame_file_name(12, FrameImageFormat::Jpeg).unwrap(), "frame_00012.jpg");
    assert_eq!(
        frame_file_name(MAX_FRAME_FILES - 1, FrameImageFormat::Bmp).unwrap(),
        "frame_99999.bmp"
    );
}

#[test]
fn name_beyond_five_digits_is_refused() {
    match frame_file_name(MAX_FRAME_FILES, FrameImageFormat::Png) {
        Err(ReframeError::FrameNumberOverflow { frame_number }) => {
            assert_eq!(frame_number, MAX_FRAME_FILES);
        }
        other => panic!("Expected FrameNumberOverflow, got: {other:?}"),
    }
}

#[test]
fn lexicographic_order_matches_numeric_order() {
    let mut names: Vec<String> = [10_000u64, 9, 99_999, 100, 0, 1_234]
        .iter()
        .map(|&n| frame_file_name(n, FrameImageFormat::Png).unwrap())
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "frame_00000.png",
            "frame_00009.png",
            "frame_00100.png",
            "frame_01234.png",
            "frame_10000.png",
            "frame_99999.png",
        ]
    );
}

#[test]
fn pattern_requires_prefix_and_extension() {
    assert!(is_frame_file_name("frame_00001.png", FrameImageFormat::Png));
    assert!(!is_frame_file_name("frame_00001.jpg", FrameImageFormat::Png));
    assert!(!is_frame_file_name("frame_00001png", FrameImageFormat::Png));
    assert!(!is_frame_file_name("Frame_00001.png", FrameImageFormat::Png));
    assert!(!is_frame_file_name("metadata.txt", FrameImageFormat::Png));
}

#[test]
fn image_format_parsing() {
    assert_eq!("png".parse::<FrameImageFormat>(), Ok(FrameImageFormat::Png));
    assert_eq!("JPEG".parse::<FrameImageFormat>(), Ok(FrameImageFormat::Jpeg));
    assert_eq!(".jpg".parse::<FrameImageFormat>(), Ok(FrameImageFormat::Jpeg));
    assert_eq!("tif".parse::<FrameImageFormat>(), Ok(FrameImageFormat::Tiff));
    assert!("webm".parse::<FrameImageFormat>().is_err());
    assert_eq!(FrameImageFormat::default(), FrameImageFormat::Png);
}

#[test]
fn listing_filters_and_sorts() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let root = directory.path();
    for name in [
        "frame_00002.png",
        "frame_00000.png",
        "frame_00001.png",
        "frame_00003.jpg",
        "thumbnail.png",
        "metadata.txt",
    ] {
        fs::write(root.join(name), b"").unwrap();
    }
    fs::create_dir(root.join("frame_00004.png")).unwrap();

    let files = list_frame_files(root, FrameImageFormat::Png).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["frame_00000.png", "frame_00001.png", "frame_00002.png"]);

    let jpegs = list_frame_files(root, FrameImageFormat::Jpeg).unwrap();
    assert_eq!(jpegs.len(), 1);
}

#[cfg(unix)]
#[test]
fn listing_follows_symlinked_frames() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let root = directory.path();
    let elsewhere = tempfile::tempdir().expect("Failed to create temp dir");
    let target = elsewhere.path().join("shared.png");
    fs::write(&target, b"").unwrap();

    fs::write(root.join("frame_00000.png"), b"").unwrap();
    std::os::unix::fs::symlink(&target, root.join("frame_00001.png")).unwrap();
    fs::write(root.join("frame_00002.png"), b"").unwrap();
    std::os::unix::fs::symlink(root.join("missing.png"), root.join("frame_00003.png")).unwrap();
    std::os::unix::fs::symlink(elsewhere.path(), root.join("frame_00004.png")).unwrap();

    let files = list_frame_files(root, FrameImageFormat::Png).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["frame_00000.png", "frame_00001.png", "frame_00002.png"]);
}

#[test]
fn listing_empty_directory() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let files = list_frame_files(directory.path(), FrameImageFormat::Png).unwrap();
    assert!(files.is_empty());
}
