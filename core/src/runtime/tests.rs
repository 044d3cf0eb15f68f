use super::*;
use tempfile::TempDir;

#[cfg(unix)]
fn script(code: u8) -> (&'static str, Vec<u8>) {
    ("setup.sh", format!("#!/bin/sh\nexit {code}\n").into_bytes())
}

#[cfg(windows)]
fn script(code: u8) -> (&'static str, Vec<u8>) {
    ("setup.cmd", format!("@exit /b {code}\r\n").into_bytes())
}

#[test]
fn key_path_depends_on_process_width() {
    assert_eq!(
        client_key_path(false),
        r"SOFTWARE\WOW6432Node\Microsoft\EdgeUpdate\Clients\{F3017226-FE2A-4295-8BDF-00C3A9A7E4C5}"
    );
    assert_eq!(
        client_key_path(true),
        r"SOFTWARE\Microsoft\EdgeUpdate\Clients\{F3017226-FE2A-4295-8BDF-00C3A9A7E4C5}"
    );
}

#[test]
fn installed_requires_non_blank_version() {
    assert!(is_installed(Some("120.0.2210.91")));
    assert!(!is_installed(Some("")));
    assert!(!is_installed(Some("   ")));
    assert!(!is_installed(None));
}

#[test]
fn scratch_dir_is_per_process() {
    let base = Path::new("tmp");
    let dir = scratch_dir(base);
    assert_eq!(dir.parent(), Some(base));
    assert!(
        dir.file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with(&std::process::id().to_string())
    );
}

#[test]
fn staged_file_is_removed_on_drop() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("nested");

    let staged = StagedFile::stage(&dir, BOOTSTRAPPER_FILE_NAME, b"MZ fake").unwrap();
    let path = staged.path().to_path_buf();
    assert_eq!(fs::read(&path).unwrap(), b"MZ fake");

    drop(staged);
    assert!(!path.exists());
}

#[test]
fn staged_file_remove_reports_result() {
    let temp = TempDir::new().unwrap();

    let staged = StagedFile::stage(temp.path(), "setup.exe", b"bytes").unwrap();
    let path = staged.path().to_path_buf();
    staged.remove().unwrap();
    assert!(!path.exists());

    let staged = StagedFile::stage(temp.path(), "setup.exe", b"bytes").unwrap();
    fs::remove_file(staged.path()).unwrap();
    staged.remove().unwrap_err();
}

#[test]
fn kept_file_survives() {
    let temp = TempDir::new().unwrap();

    let staged = StagedFile::stage(temp.path(), LOADER_FILE_NAME, b"dll").unwrap();
    let path = staged.keep();

    assert_eq!(path, temp.path().join(LOADER_FILE_NAME));
    assert!(path.exists());
}

#[test]
fn restaging_overwrites() {
    let temp = TempDir::new().unwrap();

    let first = StagedFile::stage(temp.path(), "a.bin", b"old").unwrap().keep();
    let second = StagedFile::stage(temp.path(), "a.bin", b"new").unwrap();

    assert_eq!(first, second.path());
    assert_eq!(fs::read(second.path()).unwrap(), b"new");
}

#[test]
fn bootstrapper_selection_order() {
    let scratch = Path::new("scratch");
    let configured = Path::new("configured.exe");
    let bundled = Path::new("bundled.exe");

    assert!(matches!(
        Bootstrapper::select(Some(configured), Some(&b"img"[..]), Some(bundled), scratch),
        Ok(Bootstrapper::Path(p)) if p == configured
    ));
    assert!(matches!(
        Bootstrapper::select(None, Some(&b"img"[..]), Some(bundled), scratch),
        Ok(Bootstrapper::Image { file_name: BOOTSTRAPPER_FILE_NAME, .. })
    ));
    assert!(matches!(
        Bootstrapper::select(None, None, Some(bundled), scratch),
        Ok(Bootstrapper::Path(p)) if p == bundled
    ));
    assert!(matches!(
        Bootstrapper::select(None, None, None, scratch),
        Err(InstallError::NoBootstrapper)
    ));
}

// Every case that spawns a process lives in this one test so no other test
// thread forks while a script is still open for writing.
#[test]
fn bootstrapper_runs_and_cleans_up() {
    let temp = TempDir::new().unwrap();

    let (name, failing) = script(3);
    let dir = temp.path().join("staged");
    let err = Bootstrapper::Image {
        bytes: &failing,
        dir: &dir,
        file_name: name,
    }
    .run(&BOOTSTRAPPER_ARGS)
    .unwrap_err();
    match err {
        InstallError::Failed(status) => assert_eq!(status.code(), Some(3)),
        other => panic!("expected a failed exit, got {other:?}"),
    }
    assert!(!dir.join(name).exists());

    let (name, succeeding) = script(0);
    Bootstrapper::Image {
        bytes: &succeeding,
        dir: &dir,
        file_name: name,
    }
    .run(&BOOTSTRAPPER_ARGS)
    .unwrap();
    assert!(!dir.join(name).exists());

    let on_disk = StagedFile::stage(temp.path(), name, &succeeding).unwrap();
    on_disk.make_executable().unwrap();
    let path = on_disk.keep();
    Bootstrapper::Path(&path).run(&BOOTSTRAPPER_ARGS).unwrap();
    assert!(path.exists());

    let err = Bootstrapper::Path(&temp.path().join("missing.exe"))
        .run(&BOOTSTRAPPER_ARGS)
        .unwrap_err();
    assert!(matches!(err, InstallError::Launch(_)));
}
