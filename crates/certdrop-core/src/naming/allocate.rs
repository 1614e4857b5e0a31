//! Sequential bounded search for the first free `<stem>_<n><ext>`.

use std::path::{Path, PathBuf};

use super::split::TargetName;
use crate::error::UploadError;

/// Path of the `n`-th candidate inside `dir`.
fn candidate_path(dir: &Path, name: &TargetName, n: u32) -> PathBuf {
    dir.join(name.numbered(n))
}

/// Returns the first candidate `dir/<stem>_<n><ext>` (n = 1..=max_attempts) that does not exist.
///
/// Only checks existence; nothing is created. The result can be taken by a
/// concurrent writer before it is opened, so callers must open it with
/// exclusive create and ask again on conflict.
pub fn allocate(dir: &Path, name: &TargetName, max_attempts: u32) -> Result<PathBuf, UploadError> {
    for n in 1..=max_attempts {
        let candidate = candidate_path(dir, name, n);
        // symlink_metadata: a dangling link still occupies the name.
        let taken = match std::fs::symlink_metadata(&candidate) {
            Ok(_) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(source) => {
                return Err(UploadError::Probe {
                    path: candidate,
                    source,
                })
            }
        };
        if !taken {
            tracing::trace!(candidate = %candidate.display(), "free candidate");
            return Ok(candidate);
        }
    }
    Err(UploadError::AllocationExhausted {
        dir: dir.to_path_buf(),
        name: name.to_string(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn cert() -> TargetName {
        TargetName::parse("cert.json").unwrap()
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn empty_dir_gets_first_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let p = allocate(dir.path(), &cert(), 9999).unwrap();
        assert_eq!(p, dir.path().join("cert_1.json"));
        assert!(!p.exists(), "allocate must not create the file");
    }

    #[test]
    fn next_after_consecutive_run() {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=5 {
            touch(dir.path(), &format!("cert_{n}.json"));
        }
        let p = allocate(dir.path(), &cert(), 9999).unwrap();
        assert_eq!(p, dir.path().join("cert_6.json"));
    }

    #[test]
    fn first_missing_slot_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cert_1.json");
        touch(dir.path(), "cert_3.json");
        let p = allocate(dir.path(), &cert(), 9999).unwrap();
        assert_eq!(p, dir.path().join("cert_2.json"));
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cert.json");
        touch(dir.path(), "cert_1.txt");
        touch(dir.path(), "other_1.json");
        let p = allocate(dir.path(), &cert(), 9999).unwrap();
        assert_eq!(p, dir.path().join("cert_1.json"));
    }

    #[test]
    fn directory_with_same_name_counts_as_taken() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cert_1.json")).unwrap();
        let p = allocate(dir.path(), &cert(), 9999).unwrap();
        assert_eq!(p, dir.path().join("cert_2.json"));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_counts_as_taken() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("cert_1.json"))
            .unwrap();
        let p = allocate(dir.path(), &cert(), 9999).unwrap();
        assert_eq!(p, dir.path().join("cert_2.json"));
    }

    #[test]
    fn exhausted_when_every_candidate_exists() {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=3 {
            touch(dir.path(), &format!("cert_{n}.json"));
        }
        match allocate(dir.path(), &cert(), 3) {
            Err(UploadError::AllocationExhausted { attempts, name, .. }) => {
                assert_eq!(attempts, 3);
                assert_eq!(name, "cert.json");
            }
            other => panic!("expected AllocationExhausted, got {other:?}"),
        }
    }

    #[test]
    fn zero_attempts_is_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            allocate(dir.path(), &cert(), 0),
            Err(UploadError::AllocationExhausted { attempts: 0, .. })
        ));
    }

    #[test]
    fn extensionless_base() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "dump_1");
        let name = TargetName::parse("dump").unwrap();
        let p = allocate(dir.path(), &name, 10).unwrap();
        assert_eq!(p, dir.path().join("dump_2"));
    }

    #[cfg(unix)]
    #[test]
    fn unsearchable_target_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "regular_file");
        let err = allocate(&dir.path().join("regular_file"), &cert(), 10).unwrap_err();
        match err {
            UploadError::Probe { path, .. } => {
                assert_eq!(path, dir.path().join("regular_file").join("cert_1.json"))
            }
            other => panic!("expected Probe, got {other:?}"),
        }
    }
}
