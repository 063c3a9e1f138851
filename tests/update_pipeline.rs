//! End-to-end tests for the update state machine
//!
//! A local `RemoteSource` double stands in for the network so every
//! terminal state of the pipeline can be driven deterministically.

use selfup::core::error::{Result, UpdateError};
use selfup::integrity;
use selfup::remote::RemoteSource;
use selfup::update::old_artifact_path;
use selfup::{ApplyOutcome, CheckOutcome, RemoteManifest, UpdateConfig, Updater};
use std::path::Path;
use tempfile::TempDir;

const ARTIFACT_V44: &[u8] = b"artifact bytes for 4.4";
const ARTIFACT_V45: &[u8] = b"artifact bytes for 4.5, slightly longer";

/// What the double should do when asked for the manifest
enum Fetch {
    Manifest(RemoteManifest),
    Timeout,
}

/// Test double serving a canned manifest and payload
struct FakeRemote {
    fetch: Fetch,
    payload: Vec<u8>,
    fail_download: bool,
}

impl RemoteSource for FakeRemote {
    fn fetch_manifest(&self) -> Result<RemoteManifest> {
        match &self.fetch {
            Fetch::Manifest(manifest) => Ok(manifest.clone()),
            Fetch::Timeout => Err(UpdateError::NetworkTimeout {
                url: "https://example.com/version.json".to_string(),
            }),
        }
    }

    fn download(&self, _url: &str, dest: &Path) -> Result<()> {
        if self.fail_download {
            return Err(UpdateError::download("connection reset mid-transfer"));
        }
        std::fs::write(dest, &self.payload)?;
        Ok(())
    }
}

fn manifest(version: &str, file_hash: &str) -> RemoteManifest {
    RemoteManifest {
        latest_version: version.to_string(),
        update_time: "2026-02-21 20:30:00".to_string(),
        description: "remote iteration".to_string(),
        download_url: "https://example.com/core.bin".to_string(),
        file_hash: file_hash.to_string(),
    }
}

/// Artifact on disk as 4.4, history ending at `current`
fn setup(current: &str) -> (TempDir, UpdateConfig) {
    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("core.bin");
    std::fs::write(&artifact, ARTIFACT_V44).unwrap();

    let history = serde_json::json!([
        {"version": "1.0", "date": "2026-02-21 18:00:00", "description": "initial version"},
        {"version": current, "date": "2026-02-21 20:00:00", "description": "current version"}
    ]);
    let history_path = dir.path().join("version_history.json");
    std::fs::write(&history_path, serde_json::to_string_pretty(&history).unwrap()).unwrap();

    let config = UpdateConfig {
        manifest_url: "https://example.com/version.json".to_string(),
        artifact_path: artifact,
        backup_dir: dir.path().join("backups"),
        history_path,
        timeout_secs: 10,
        auto_check: true,
    };
    (dir, config)
}

fn payload_hash(payload: &[u8]) -> String {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), payload).unwrap();
    integrity::digest(file.path()).unwrap()
}

/// No stray `.candidate-*` temp files next to the artifact
fn assert_no_temp_files(artifact: &Path) {
    let dir = artifact.parent().unwrap();
    for entry in std::fs::read_dir(dir).unwrap() {
        let name = entry.unwrap().file_name();
        let name = name.to_string_lossy().into_owned();
        assert!(
            !name.starts_with(".candidate-"),
            "leftover temp file: {}",
            name
        );
    }
}

#[test]
fn successful_update_swaps_and_records() {
    let (_dir, config) = setup("4.4");
    let artifact = config.artifact_path.clone();

    let remote = FakeRemote {
        fetch: Fetch::Manifest(manifest("4.5", &payload_hash(ARTIFACT_V45))),
        payload: ARTIFACT_V45.to_vec(),
        fail_download: false,
    };
    let mut updater = Updater::new(config, remote).unwrap();
    assert_eq!(updater.current_version(), "4.4");

    let outcome = updater.apply_update(None).unwrap();
    let (new_version, backup, old_artifact) = match outcome {
        ApplyOutcome::Updated {
            new_version,
            backup,
            old_artifact,
        } => (new_version, backup, old_artifact),
        other => panic!("expected Updated, got {:?}", other),
    };

    assert_eq!(new_version, "4.5");
    assert_eq!(std::fs::read(&artifact).unwrap(), ARTIFACT_V45);

    // Retained recovery points: the backup and the .old file
    assert_eq!(std::fs::read(&backup.path).unwrap(), ARTIFACT_V44);
    assert_eq!(backup.version, "4.4");
    assert_eq!(old_artifact, old_artifact_path(&artifact));
    assert_eq!(std::fs::read(&old_artifact).unwrap(), ARTIFACT_V44);

    // History grew by exactly one and the last entry mirrors the manifest
    let entries = updater.history().entries();
    assert_eq!(entries.len(), 3);
    let last = entries.last().unwrap();
    assert_eq!(last.version, "4.5");
    assert_eq!(last.date, "2026-02-21 20:30:00");
    assert_eq!(last.description, "remote iteration");

    assert_eq!(updater.current_version(), "4.5");
    assert_no_temp_files(&artifact);
}

#[test]
fn fetch_timeout_changes_nothing() {
    let (_dir, config) = setup("4.4");
    let artifact = config.artifact_path.clone();
    let backup_dir = config.backup_dir.clone();
    let history_before = std::fs::read(&config.history_path).unwrap();
    let history_path = config.history_path.clone();

    let remote = FakeRemote {
        fetch: Fetch::Timeout,
        payload: Vec::new(),
        fail_download: false,
    };
    let mut updater = Updater::new(config, remote).unwrap();

    let err = updater.apply_update(None).unwrap_err();
    assert!(matches!(err, UpdateError::NetworkTimeout { .. }));

    assert_eq!(updater.current_version(), "4.4");
    assert_eq!(std::fs::read(&artifact).unwrap(), ARTIFACT_V44);
    assert_eq!(std::fs::read(&history_path).unwrap(), history_before);
    assert!(!backup_dir.exists(), "no backup for a failed fetch");
}

#[test]
fn remote_not_newer_performs_zero_writes() {
    // current = 4.5, remote advertises 4.4
    let (_dir, config) = setup("4.5");
    let artifact = config.artifact_path.clone();
    let backup_dir = config.backup_dir.clone();
    let history_before = std::fs::read(&config.history_path).unwrap();
    let history_path = config.history_path.clone();

    let remote = FakeRemote {
        fetch: Fetch::Manifest(manifest("4.4", "")),
        payload: ARTIFACT_V45.to_vec(),
        fail_download: false,
    };
    let mut updater = Updater::new(config, remote).unwrap();

    match updater.apply_update(None).unwrap() {
        ApplyOutcome::AlreadyUpToDate { current } => assert_eq!(current, "4.5"),
        other => panic!("expected AlreadyUpToDate, got {:?}", other),
    }

    assert_eq!(std::fs::read(&artifact).unwrap(), ARTIFACT_V44);
    assert_eq!(std::fs::read(&history_path).unwrap(), history_before);
    assert!(!backup_dir.exists(), "no backup when already up to date");
    assert_no_temp_files(&artifact);
}

#[test]
fn hash_mismatch_aborts_and_cleans_temp() {
    let (_dir, config) = setup("4.4");
    let artifact = config.artifact_path.clone();

    let remote = FakeRemote {
        fetch: Fetch::Manifest(manifest("4.5", "abc")),
        payload: ARTIFACT_V45.to_vec(),
        fail_download: false,
    };
    let mut updater = Updater::new(config, remote).unwrap();
    let digest_before = integrity::digest(&artifact).unwrap();

    let err = updater.apply_update(None).unwrap_err();
    match err {
        UpdateError::IntegrityMismatch { expected, actual } => {
            assert_eq!(expected, "abc");
            assert_ne!(actual, "abc");
            assert!(!actual.is_empty(), "computed digest must be reported");
        }
        other => panic!("expected IntegrityMismatch, got {:?}", other),
    }

    // Artifact untouched, temp download gone, history unchanged
    assert_eq!(integrity::digest(&artifact).unwrap(), digest_before);
    assert_no_temp_files(&artifact);
    assert_eq!(updater.current_version(), "4.4");

    // The attempt reached the backing-up state, so a backup exists
    let backups = updater.backups().list().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].version, "4.4");
}

#[test]
fn download_failure_aborts_but_retains_backup() {
    let (_dir, config) = setup("4.4");
    let artifact = config.artifact_path.clone();

    let remote = FakeRemote {
        fetch: Fetch::Manifest(manifest("4.5", "")),
        payload: Vec::new(),
        fail_download: true,
    };
    let mut updater = Updater::new(config, remote).unwrap();

    let err = updater.apply_update(None).unwrap_err();
    assert!(matches!(err, UpdateError::Download { .. }));

    assert_eq!(std::fs::read(&artifact).unwrap(), ARTIFACT_V44);
    assert_eq!(updater.current_version(), "4.4");
    assert_no_temp_files(&artifact);

    // Backup precedes the destructive phase and is not undone
    assert_eq!(updater.backups().list().unwrap().len(), 1);
}

#[test]
fn empty_manifest_hash_skips_verification() {
    let (_dir, config) = setup("4.4");
    let artifact = config.artifact_path.clone();

    let remote = FakeRemote {
        fetch: Fetch::Manifest(manifest("4.5", "")),
        payload: ARTIFACT_V45.to_vec(),
        fail_download: false,
    };
    let mut updater = Updater::new(config, remote).unwrap();

    let outcome = updater.apply_update(None).unwrap();
    assert!(matches!(outcome, ApplyOutcome::Updated { .. }));
    assert_eq!(std::fs::read(&artifact).unwrap(), ARTIFACT_V45);
}

#[test]
fn check_mode_never_mutates() {
    let (_dir, config) = setup("4.4");
    let artifact = config.artifact_path.clone();
    let backup_dir = config.backup_dir.clone();
    let history_before = std::fs::read(&config.history_path).unwrap();
    let history_path = config.history_path.clone();

    let remote = FakeRemote {
        fetch: Fetch::Manifest(manifest("4.5", &payload_hash(ARTIFACT_V45))),
        payload: ARTIFACT_V45.to_vec(),
        fail_download: false,
    };
    let updater = Updater::new(config, remote).unwrap();

    match updater.check_for_updates(true).unwrap() {
        CheckOutcome::UpdateAvailable { manifest } => {
            assert_eq!(manifest.latest_version, "4.5");
        }
        other => panic!("expected UpdateAvailable, got {:?}", other),
    }

    // Check-only: found the newer version, wrote nothing
    assert_eq!(std::fs::read(&artifact).unwrap(), ARTIFACT_V44);
    assert_eq!(std::fs::read(&history_path).unwrap(), history_before);
    assert!(!backup_dir.exists());
}

#[test]
fn check_reports_up_to_date() {
    let (_dir, config) = setup("4.5");

    let remote = FakeRemote {
        fetch: Fetch::Manifest(manifest("4.5", "")),
        payload: Vec::new(),
        fail_download: false,
    };
    let updater = Updater::new(config, remote).unwrap();

    match updater.check_for_updates(false).unwrap() {
        CheckOutcome::UpToDate { current } => assert_eq!(current, "4.5"),
        other => panic!("expected UpToDate, got {:?}", other),
    }
}

#[test]
fn repeated_apply_is_idempotent() {
    let (_dir, config) = setup("4.4");
    let artifact = config.artifact_path.clone();

    let remote = FakeRemote {
        fetch: Fetch::Manifest(manifest("4.5", &payload_hash(ARTIFACT_V45))),
        payload: ARTIFACT_V45.to_vec(),
        fail_download: false,
    };
    let mut updater = Updater::new(config, remote).unwrap();

    assert!(matches!(
        updater.apply_update(None).unwrap(),
        ApplyOutcome::Updated { .. }
    ));

    // Second invocation finds nothing newer and touches nothing
    let backups_before = updater.backups().list().unwrap().len();
    assert!(matches!(
        updater.apply_update(None).unwrap(),
        ApplyOutcome::AlreadyUpToDate { .. }
    ));
    assert_eq!(updater.backups().list().unwrap().len(), backups_before);
    assert_eq!(std::fs::read(&artifact).unwrap(), ARTIFACT_V45);
    assert_eq!(updater.history().entries().len(), 3);
}
