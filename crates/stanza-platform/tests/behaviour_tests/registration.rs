//! Install / remove against the init directory.

use std::fs;

use stanza_core::{Service, ServiceError};

use super::myd_service;

#[tokio::test]
async fn install_over_existing_job_leaves_it_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let service = myd_service(dir.path());

    let original = b"# hand-written job\nexec /bin/true\n\xff\x00";
    fs::write(service.job_path(), original).unwrap();

    let err = service.install().await.unwrap_err();
    assert!(err.is_already_exists(), "unexpected error: {err}");
    match err {
        ServiceError::AlreadyExists(path) => assert_eq!(path, service.job_path()),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(fs::read(service.job_path()).unwrap(), original);
}

#[tokio::test]
async fn install_then_remove_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let service = myd_service(dir.path());

    service.install().await.unwrap();
    assert!(service.job_path().is_file());

    service.remove().await.unwrap();
    assert!(!service.job_path().exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn remove_without_install_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let bystander = dir.path().join("other.conf");
    fs::write(&bystander, "exec /bin/true\n").unwrap();

    let service = myd_service(dir.path());
    let err = service.remove().await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries, vec![bystander]);
}

#[tokio::test]
async fn install_twice_fails_second_time() {
    let dir = tempfile::tempdir().unwrap();
    let service = myd_service(dir.path());

    service.install().await.unwrap();
    let first = fs::read(service.job_path()).unwrap();

    assert!(service.install().await.unwrap_err().is_already_exists());
    assert_eq!(fs::read(service.job_path()).unwrap(), first);
}

#[tokio::test]
async fn reinstall_after_remove_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let service = myd_service(dir.path());

    service.install().await.unwrap();
    service.remove().await.unwrap();
    service.install().await.unwrap();
    assert!(service.is_installed().await.unwrap());
}

#[tokio::test]
async fn installed_job_matches_reference_stanza() {
    let dir = tempfile::tempdir().unwrap();
    let service = myd_service(dir.path());
    service.install().await.unwrap();

    let job = fs::read_to_string(dir.path().join("myd.conf")).unwrap();
    assert!(job.contains("description     \"My Daemon\""));
    assert!(job.contains("# does things"));
    assert!(job.contains("exec /usr/local/bin/myd"));
    assert!(job.contains("respawn limit 10 5"));
    assert!(job.contains("kill signal INT"));
    assert!(job.contains("umask 022"));
    assert!(job.contains("console none"));

    let opens = job
        .lines()
        .filter(|l| l.trim_end().ends_with("script") && !l.starts_with("end"))
        .count();
    let closes = job.lines().filter(|l| l.trim() == "end script").count();
    assert_eq!(opens, 1);
    assert_eq!(closes, 1);
}
