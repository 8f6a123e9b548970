// Server root module
// Resolves the directory whose subtree is served

use std::io;
use std::path::{Path, PathBuf};

use crate::error::ServerError;

/// Directory containing the running executable, symlinks resolved
pub fn program_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "executable path has no parent directory",
        )
    })
}

/// Resolve the server root
///
/// Defaults to the program's own directory. A configured root is taken as is
/// when absolute and relative to the program directory otherwise, so the
/// caller's working directory never matters.
pub fn resolve_root(configured: Option<&str>) -> Result<PathBuf, ServerError> {
    let base = program_dir().map_err(|source| ServerError::RootDir {
        path: PathBuf::new(),
        source,
    })?;
    resolve_root_from(&base, configured)
}

/// Resolve `configured` against `base` and check it is a readable directory
pub fn resolve_root_from(base: &Path, configured: Option<&str>) -> Result<PathBuf, ServerError> {
    let candidate = configured.map_or_else(|| base.to_path_buf(), |p| base.join(p));

    let root = candidate
        .canonicalize()
        .map_err(|source| ServerError::RootDir {
            path: candidate.clone(),
            source,
        })?;

    if !root.is_dir() {
        return Err(ServerError::RootDir {
            path: root,
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    // Fail at startup rather than on the first request
    std::fs::read_dir(&root).map_err(|source| ServerError::RootDir {
        path: root.clone(),
        source,
    })?;

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_root_is_program_dir() {
        let root = resolve_root(None).unwrap();
        let exe_dir = std::env::current_exe()
            .unwrap()
            .canonicalize()
            .unwrap()
            .parent()
            .unwrap()
            .to_path_buf();
        assert_eq!(root, exe_dir);
    }

    #[test]
    fn test_relative_root_resolves_against_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("public")).unwrap();

        let root = resolve_root_from(dir.path(), Some("public")).unwrap();
        assert_eq!(root, dir.path().join("public").canonicalize().unwrap());
    }

    #[test]
    fn test_absolute_root_overrides_base() {
        let base = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let configured = other.path().to_str().unwrap();

        let root = resolve_root_from(base.path(), Some(configured)).unwrap();
        assert_eq!(root, other.path().canonicalize().unwrap());
    }

    #[test]
    fn test_missing_or_file_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file.txt"), "x").unwrap();

        assert!(matches!(
            resolve_root_from(dir.path(), Some("missing")),
            Err(ServerError::RootDir { .. })
        ));
        assert!(matches!(
            resolve_root_from(dir.path(), Some("file.txt")),
            Err(ServerError::RootDir { .. })
        ));
    }
}
