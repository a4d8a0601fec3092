//! End-to-end update cycle scenarios against a mock distribution
//! endpoint.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use nix::unistd::{Gid, Uid};
use tempfile::TempDir;

use sig_update_helper::config::Ownership;
use sig_update_helper::core::errors::{Result as SuhResult, SuhError};
use sig_update_helper::notify::Notifier;
use sig_update_helper::updater::cycle::Updater;
use sig_update_helper::updater::fetch::Endpoint;
use sig_update_helper::updater::revision::MARKER_FILE;

/// Notifier double that counts deliveries instead of signalling.
struct RecordingNotifier {
    delivered: AtomicUsize,
    fail: bool,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            delivered: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            delivered: AtomicUsize::new(0),
            fail: true,
        }
    }

    fn count(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self) -> SuhResult<()> {
        if self.fail {
            return Err(SuhError::Notify {
                target: "test-service".to_string(),
                details: "delivery refused".to_string(),
            });
        }
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn target(&self) -> String {
        "test-service".to_string()
    }
}

fn self_ownership() -> Ownership {
    Ownership {
        uid: Uid::current(),
        gid: Gid::current(),
    }
}

fn updater_for(server: &mockito::Server, dir: &Path, version: &str) -> Updater {
    let endpoint = Endpoint::new(format!("{}/", server.url())).expect("client");
    Updater::new(endpoint, dir.to_path_buf(), version, self_ownership())
}

fn package_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        for (name, contents) in entries {
            let options: zip::write::FileOptions<'_, ()> =
                zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
            writer.start_file(*name, options).expect("start entry");
            writer.write_all(contents).expect("write entry");
        }
        writer.finish().expect("finish archive");
    }
    cursor.into_inner()
}

fn marker_contents(dir: &Path) -> Option<String> {
    fs::read_to_string(dir.join(MARKER_FILE)).ok()
}

fn seed_marker(dir: &Path, revision: &str) {
    fs::write(dir.join(MARKER_FILE), revision).expect("seed marker");
}

#[test]
fn fresh_directory_downloads_unpacks_and_records_marker() {
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");

    // Hit once by the check and once by the apply.
    let revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(200)
        .with_body("R42\n")
        .expect(2)
        .create();
    // Engine version 4.75.0 shortens to 475.
    let package_mock = server
        .mock("GET", "/475_ides.zip")
        .with_status(200)
        .with_body(package_bytes(&[("anti-virus-01.ide", b"sig-data")]))
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75.0");
    let notifier = RecordingNotifier::new();

    updater.run_cycle(&notifier).expect("cycle");

    revision_mock.assert();
    package_mock.assert();
    assert_eq!(notifier.count(), 1);
    assert_eq!(marker_contents(tmp.path()).as_deref(), Some("R42"));
    assert_eq!(
        fs::read(tmp.path().join("anti-virus-01.ide")).expect("read"),
        b"sig-data"
    );
}

#[test]
fn matching_revisions_skip_download_and_signal() {
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");
    seed_marker(tmp.path(), "R42");

    let _revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(200)
        .with_body("R42\n")
        .create();
    let package_mock = server
        .mock("GET", "/475_ides.zip")
        .with_status(200)
        .with_body("unreachable")
        .expect(0)
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75");
    let notifier = RecordingNotifier::new();

    updater.run_cycle(&notifier).expect("cycle");

    package_mock.assert();
    assert_eq!(notifier.count(), 0);
    assert_eq!(marker_contents(tmp.path()).as_deref(), Some("R42"));
}

#[test]
fn empty_local_and_empty_remote_compare_equal() {
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");

    let _revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(200)
        .with_body("\n")
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75");
    assert!(!updater.check_for_update().expect("check"));
}

#[test]
fn revision_fetch_failure_is_a_hard_error_not_up_to_date() {
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");

    let _revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(500)
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75");
    let err = updater.check_for_update().expect_err("should fail");
    assert!(matches!(err, SuhError::Fetch { .. }));
    assert!(err.is_transient());
}

#[test]
fn failed_download_leaves_marker_untouched() {
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");
    seed_marker(tmp.path(), "R41");

    let _revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(200)
        .with_body("R42\n")
        .expect(2)
        .create();
    let _package_mock = server
        .mock("GET", "/475_ides.zip")
        .with_status(404)
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75");
    let notifier = RecordingNotifier::new();

    let err = updater.run_cycle(&notifier).expect_err("should fail");
    assert!(matches!(err, SuhError::Fetch { .. }));
    assert_eq!(notifier.count(), 0);
    assert_eq!(marker_contents(tmp.path()).as_deref(), Some("R41"));
}

#[test]
fn corrupt_package_leaves_marker_untouched() {
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");
    seed_marker(tmp.path(), "R41");

    let _revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(200)
        .with_body("R42\n")
        .expect(2)
        .create();
    let _package_mock = server
        .mock("GET", "/475_ides.zip")
        .with_status(200)
        .with_body("definitely not a zip archive")
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75");
    let notifier = RecordingNotifier::new();

    let err = updater.run_cycle(&notifier).expect_err("should fail");
    assert!(matches!(err, SuhError::Unpack { .. }));
    assert_eq!(notifier.count(), 0);
    assert_eq!(marker_contents(tmp.path()).as_deref(), Some("R41"));
}

#[test]
fn failed_notification_leaves_marker_untouched() {
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");
    seed_marker(tmp.path(), "R41");

    let _revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(200)
        .with_body("R42\n")
        .expect(2)
        .create();
    let _package_mock = server
        .mock("GET", "/475_ides.zip")
        .with_status(200)
        .with_body(package_bytes(&[("anti-virus-01.ide", b"sig-data")]))
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75");
    let notifier = RecordingNotifier::failing();

    let err = updater.run_cycle(&notifier).expect_err("should fail");
    assert!(matches!(err, SuhError::Notify { .. }));
    assert_eq!(marker_contents(tmp.path()).as_deref(), Some("R41"));
}

#[test]
fn successful_reapply_downloads_again() {
    // Only the marker is cached, never an "already applied" memo: a
    // second apply with an unchanged remote downloads and unpacks again.
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");

    let revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(200)
        .with_body("R42\n")
        .expect(2)
        .create();
    let package_mock = server
        .mock("GET", "/475_ides.zip")
        .with_status(200)
        .with_body(package_bytes(&[("anti-virus-01.ide", b"sig-data")]))
        .expect(2)
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75");
    let notifier = RecordingNotifier::new();

    updater.apply_update(&notifier).expect("first apply");
    updater.apply_update(&notifier).expect("second apply");

    revision_mock.assert();
    package_mock.assert();
    assert_eq!(notifier.count(), 2);
    assert_eq!(marker_contents(tmp.path()).as_deref(), Some("R42"));
}

#[test]
fn apply_persists_the_revision_fetched_at_apply_time() {
    let mut server = mockito::Server::new();
    let tmp = TempDir::new().expect("tempdir");
    seed_marker(tmp.path(), "R41");

    let _revision_mock = server
        .mock("GET", "/ide_dgst.txt")
        .with_status(200)
        .with_body("R43\n")
        .create();
    let _package_mock = server
        .mock("GET", "/475_ides.zip")
        .with_status(200)
        .with_body(package_bytes(&[("anti-virus-01.ide", b"sig-data")]))
        .create();

    let updater = updater_for(&server, tmp.path(), "4.75");
    let notifier = RecordingNotifier::new();

    updater.apply_update(&notifier).expect("apply");
    assert_eq!(marker_contents(tmp.path()).as_deref(), Some("R43"));
}
