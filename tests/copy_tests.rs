//! Tests for timestamp-preserving file copy

use prosync::executor::{copy_clone, mirror_timestamps, CopyOutcome};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

fn create_test_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    let mut file = fs::File::create(path).expect("Failed to create test file");
    file.write_all(content).expect("Failed to write test content");
    file.flush().expect("Failed to flush");
}

fn set_file_mtime(path: &Path, mtime: SystemTime) {
    let filetime_mtime = filetime::FileTime::from_system_time(mtime);
    filetime::set_file_mtime(path, filetime_mtime).expect("Failed to set mtime");
}

fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path)
        .expect("Failed to read metadata")
        .modified()
        .expect("Failed to read mtime")
}

#[test]
fn test_copy_basic_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("Amazing Grace.pro6");
    let content = b"<RVPresentationDocument/>";
    create_test_file(&src_path, content);

    let dest_path = temp_dir.path().join("copy.pro6");
    let outcome = copy_clone(&src_path, &dest_path, true).expect("copy_clone should succeed");

    assert_eq!(outcome, CopyOutcome::Copied(content.len() as u64));
    assert_eq!(fs::read(&dest_path).expect("Failed to read dest"), content);
}

#[test]
fn test_copy_creates_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("intro.mov");
    create_test_file(&src_path, b"frames");

    let dest_path = temp_dir.path().join("Media/Clips/2024/intro.mov");
    copy_clone(&src_path, &dest_path, false).expect("copy_clone should succeed");

    assert!(dest_path.exists());
}

#[test]
fn test_copy_preserves_mtime_regardless_of_wall_clock() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("song.pro6");
    create_test_file(&src_path, b"verse");
    let past = UNIX_EPOCH + Duration::from_secs(1_234_567_890);
    set_file_mtime(&src_path, past);

    let dest_path = temp_dir.path().join("dest/song.pro6");
    copy_clone(&src_path, &dest_path, true).expect("copy_clone should succeed");

    assert_eq!(mtime(&dest_path), mtime(&src_path));
}

#[test]
fn test_overwrite_replaces_content_and_timestamp() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("src.pro6");
    let dest_path = temp_dir.path().join("dest.pro6");
    create_test_file(&src_path, b"new words");
    create_test_file(&dest_path, b"old words, longer than the new ones");
    set_file_mtime(&src_path, UNIX_EPOCH + Duration::from_secs(2_000_000_000));

    copy_clone(&src_path, &dest_path, true).expect("copy_clone should succeed");

    assert_eq!(fs::read(&dest_path).expect("read"), b"new words");
    assert_eq!(mtime(&dest_path), mtime(&src_path));
}

#[test]
fn test_no_overwrite_is_a_noop() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("src.pro6");
    let dest_path = temp_dir.path().join("dest.pro6");
    create_test_file(&src_path, b"incoming");
    create_test_file(&dest_path, b"existing");
    let before = UNIX_EPOCH + Duration::from_secs(1_000_000);
    set_file_mtime(&dest_path, before);

    let outcome = copy_clone(&src_path, &dest_path, false).expect("copy_clone should succeed");

    assert_eq!(outcome, CopyOutcome::AlreadyPresent);
    assert_eq!(fs::read(&dest_path).expect("read"), b"existing");
    assert_eq!(mtime(&dest_path), before);
}

#[test]
fn test_copy_empty_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("empty.pro6");
    create_test_file(&src_path, b"");

    let dest_path = temp_dir.path().join("empty-copy.pro6");
    let outcome = copy_clone(&src_path, &dest_path, true).expect("copy_clone should succeed");

    assert_eq!(outcome, CopyOutcome::Copied(0));
    assert!(dest_path.exists());
}

#[test]
fn test_copy_large_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("large.mov");
    // Larger than the copy buffer so the loop runs more than once
    let content: Vec<u8> = (0..400_000u32).map(|i| (i % 251) as u8).collect();
    create_test_file(&src_path, &content);

    let dest_path = temp_dir.path().join("large-copy.mov");
    copy_clone(&src_path, &dest_path, true).expect("copy_clone should succeed");

    assert_eq!(fs::read(&dest_path).expect("read"), content);
}

#[test]
fn test_no_part_file_left_behind() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("song.pro6");
    create_test_file(&src_path, b"content");

    let dest_path = temp_dir.path().join("out/song.pro6");
    copy_clone(&src_path, &dest_path, true).expect("copy_clone should succeed");

    let names: Vec<String> = fs::read_dir(temp_dir.path().join("out"))
        .expect("read_dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(names, vec!["song.pro6".to_string()]);
}

#[test]
fn test_missing_source_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = copy_clone(
        &temp_dir.path().join("absent.pro6"),
        &temp_dir.path().join("dest.pro6"),
        true,
    );
    assert!(result.is_err());
}

#[test]
fn test_mirror_timestamps_after_rewrite() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("src.pro6pl");
    let dest_path = temp_dir.path().join("dest.pro6pl");
    create_test_file(&src_path, b"a");
    create_test_file(&dest_path, b"b");
    set_file_mtime(&src_path, UNIX_EPOCH + Duration::from_secs(1_500_000_000));

    mirror_timestamps(&src_path, &dest_path).expect("mirror should succeed");

    assert_eq!(mtime(&dest_path), mtime(&src_path));
}

#[test]
#[cfg(unix)]
fn test_copy_preserves_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("script.sh");
    create_test_file(&src_path, b"#!/bin/sh");
    fs::set_permissions(&src_path, fs::Permissions::from_mode(0o750)).expect("chmod");

    let dest_path = temp_dir.path().join("copy.sh");
    copy_clone(&src_path, &dest_path, true).expect("copy_clone should succeed");

    let mode = fs::metadata(&dest_path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o750);
}
