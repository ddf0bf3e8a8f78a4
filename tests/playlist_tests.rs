//! Playlist category: localization on receive and conflict resolution by
//! embedded edit time.

use filetime::FileTime;
use prosync::types::{Category, CategoryRoots, SyncDirection, SyncPolicy};
use prosync::{synchronize, CategoryReport, SyncError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LIBRARY_REF: &str = "E:\\NewLib\\";

fn playlist(modified: &str, cue_path: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<RVPlaylistDocument versionNumber="600">
    <RVPlaylistNode displayName="Sunday" modifiedDate="{modified}" type="3">
        <array rvXMLIvarName="children">
            <RVDocumentCue displayName="Song" filePath="{cue_path}" />
        </array>
    </RVPlaylistNode>
</RVPlaylistDocument>
"#
    )
}

fn write_at(path: &Path, contents: &str, secs: i64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write playlist");
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).expect("set mtime");
}

fn mtime_secs(path: &Path) -> i64 {
    let meta = fs::metadata(path).expect("metadata");
    FileTime::from_last_modification_time(&meta).unix_seconds()
}

fn scratch() -> (TempDir, CategoryRoots) {
    let temp = TempDir::new().expect("create tempdir");
    let roots = CategoryRoots::new(temp.path().join("remote"), temp.path().join("local"));
    (temp, roots)
}

fn sync_playlists(
    roots: &CategoryRoots,
    direction: SyncDirection,
) -> Result<CategoryReport, SyncError> {
    synchronize(
        Category::Playlists,
        roots,
        SyncPolicy::new(direction, false),
        LIBRARY_REF,
        false,
        None,
    )
}

#[test]
fn test_new_playlist_is_localized() {
    let (_temp, roots) = scratch();
    write_at(
        &roots.remote.join("Sunday.pro6pl"),
        &playlist("2021-01-01T10:00:00+00:00", "D%3A%5COld%5CSong.mp4"),
        5_000,
    );

    let report = sync_playlists(&roots, SyncDirection::Both).expect("sync");

    assert_eq!(report.plan.localize_count, 1);
    let local = roots.local.join("Sunday.pro6pl");
    let text = fs::read_to_string(&local).expect("read");
    assert!(text.contains(r#"filePath="E%3A%5CNewLib%5CSong.mp4""#));
    assert!(text.contains(r#"modifiedDate="2021-01-01T10:00:00+00:00""#));
    assert_eq!(mtime_secs(&local), 5_000);
}

#[test]
fn test_localized_playlist_converges() {
    let (_temp, roots) = scratch();
    write_at(
        &roots.remote.join("Sunday.pro6pl"),
        &playlist("2021-01-01T10:00:00+00:00", "D%3A%5COld%5CSong.mp4"),
        5_000,
    );

    sync_playlists(&roots, SyncDirection::Both).expect("first sync");
    let second = sync_playlists(&roots, SyncDirection::Both).expect("second sync");

    assert!(second.is_converged());
    assert_eq!(second.unchanged, 1);
}

#[test]
fn test_uploaded_playlist_is_not_rewritten() {
    let (_temp, roots) = scratch();
    let original = playlist("2021-01-01T10:00:00+00:00", "C%3A%5CMine%5CSong.mp4");
    write_at(&roots.local.join("Mine.pro6pl"), &original, 5_000);

    sync_playlists(&roots, SyncDirection::Both).expect("sync");

    assert_eq!(
        fs::read_to_string(roots.remote.join("Mine.pro6pl")).expect("read"),
        original
    );
}

#[test]
fn test_conflict_uses_embedded_date_not_mtime() {
    let (_temp, roots) = scratch();
    // Remote has the older file on disk but the later authorial edit
    write_at(
        &roots.remote.join("Sunday.pro6pl"),
        &playlist("2021-06-01T10:00:00+00:00", "D%3A%5CA%5CNew.mp4"),
        1_000,
    );
    write_at(
        &roots.local.join("Sunday.pro6pl"),
        &playlist("2021-05-01T10:00:00+00:00", "E%3A%5CNewLib%5COld.mp4"),
        9_000,
    );

    let report = sync_playlists(&roots, SyncDirection::Both).expect("sync");

    assert_eq!(report.plan.localize_count, 1);
    let text = fs::read_to_string(roots.local.join("Sunday.pro6pl")).expect("read");
    assert!(text.contains("2021-06-01T10:00:00+00:00"));
    assert!(text.contains(r#"filePath="E%3A%5CNewLib%5CNew.mp4""#));
}

#[test]
fn test_conflict_local_edit_is_uploaded() {
    let (_temp, roots) = scratch();
    write_at(
        &roots.remote.join("Sunday.pro6pl"),
        &playlist("2021-05-01T10:00:00+00:00", "D%3A%5CA%5COld.mp4"),
        9_000,
    );
    let local_doc = playlist("2021-06-01T10:00:00+00:00", "E%3A%5CNewLib%5CNew.mp4");
    write_at(&roots.local.join("Sunday.pro6pl"), &local_doc, 1_000);

    let report = sync_playlists(&roots, SyncDirection::Both).expect("sync");

    assert_eq!(report.plan.upload_count, 1);
    assert_eq!(
        fs::read_to_string(roots.remote.join("Sunday.pro6pl")).expect("read"),
        local_doc
    );
    assert_eq!(mtime_secs(&roots.remote.join("Sunday.pro6pl")), 1_000);
}

#[test]
fn test_conflict_tie_goes_local() {
    let (_temp, roots) = scratch();
    write_at(
        &roots.remote.join("Sunday.pro6pl"),
        &playlist("2021-05-01T10:00:00+00:00", "D%3A%5CA%5CRemote.mp4"),
        9_000,
    );
    let local_doc = playlist("2021-05-01T10:00:00+00:00", "E%3A%5CNewLib%5CLocal.mp4");
    write_at(&roots.local.join("Sunday.pro6pl"), &local_doc, 1_000);

    sync_playlists(&roots, SyncDirection::Both).expect("sync");

    assert_eq!(
        fs::read_to_string(roots.remote.join("Sunday.pro6pl")).expect("read"),
        local_doc
    );
}

#[test]
fn test_conflict_winner_still_subject_to_direction() {
    let (_temp, roots) = scratch();
    let remote_doc = playlist("2021-06-01T10:00:00+00:00", "D%3A%5CA%5CNew.mp4");
    let local_doc = playlist("2021-05-01T10:00:00+00:00", "E%3A%5CNewLib%5COld.mp4");
    write_at(&roots.remote.join("Sunday.pro6pl"), &remote_doc, 1_000);
    write_at(&roots.local.join("Sunday.pro6pl"), &local_doc, 9_000);

    let report = sync_playlists(&roots, SyncDirection::Up).expect("sync");

    assert_eq!(report.plan.direction_skips, 1);
    assert_eq!(
        fs::read_to_string(roots.remote.join("Sunday.pro6pl")).expect("read"),
        remote_doc
    );
    assert_eq!(
        fs::read_to_string(roots.local.join("Sunday.pro6pl")).expect("read"),
        local_doc
    );
}

#[test]
fn test_malformed_playlist_fails_without_touching_local() {
    let (_temp, roots) = scratch();
    write_at(
        &roots.remote.join("Broken.pro6pl"),
        "<RVPlaylistDocument><RVPlaylistNode></RVPlaylistDocument>",
        1_000,
    );
    fs::create_dir_all(&roots.local).expect("create local");

    let err = sync_playlists(&roots, SyncDirection::Both).unwrap_err();

    assert!(err.is_playlist_error());
    assert!(!roots.local.join("Broken.pro6pl").exists());
}

#[test]
fn test_truncated_playlist_fails_without_touching_local() {
    let (_temp, roots) = scratch();
    let full = playlist("2021-01-01T00:00:00+00:00", "D%3A%5COld%5CSong.mp4");
    let cut = &full[..full.find("</array>").expect("closing tag")];
    write_at(&roots.remote.join("Sunday.pro6pl"), cut, 1_000);
    fs::create_dir_all(&roots.local).expect("create local");

    let err = sync_playlists(&roots, SyncDirection::Both).unwrap_err();

    assert!(err.is_playlist_error());
    assert!(!roots.local.join("Sunday.pro6pl").exists());
}

#[test]
fn test_truncated_playlist_in_conflict_is_fatal() {
    let (_temp, roots) = scratch();
    let full = playlist("2021-06-01T00:00:00+00:00", "D%3A%5COld%5CSong.mp4");
    let cut = &full[..full.find("</RVPlaylistNode>").expect("closing tag")];
    write_at(&roots.remote.join("Sunday.pro6pl"), cut, 2_000);
    let local_body = playlist("2020-01-01T00:00:00+00:00", "E%3A%5CNewLib%5CSong.mp4");
    write_at(&roots.local.join("Sunday.pro6pl"), &local_body, 1_000);

    let err = sync_playlists(&roots, SyncDirection::Both).unwrap_err();

    assert!(err.is_playlist_error());
    assert_eq!(
        fs::read_to_string(roots.local.join("Sunday.pro6pl")).expect("read local"),
        local_body
    );
}

#[test]
fn test_playlist_subfolders_are_ignored() {
    let (_temp, roots) = scratch();
    write_at(
        &roots.remote.join("Archive/Old.pro6pl"),
        &playlist("2020-01-01T00:00:00+00:00", "D%3A%5CA%5CX.mp4"),
        1_000,
    );

    let report = sync_playlists(&roots, SyncDirection::Both).expect("sync");

    assert_eq!(report.plan.transfer_count(), 0);
    assert!(!roots.local.join("Archive").exists());
}
