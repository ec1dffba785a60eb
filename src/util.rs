/// Filesystem primitives with mode handling kept in one place.
pub mod fs {
    use std::fs::{self, DirBuilder, OpenOptions};
    use std::io;
    use std::path::Path;

    use filetime::FileTime;

    /// Ensure a directory exists, creating it and any missing ancestors with `mode`.
    pub fn ensure_dir(path: &Path, mode: u32) -> io::Result<()> {
        // DirBuilder reports success for "" without creating anything.
        if path.as_os_str().is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "empty path"));
        }
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path)
    }

    /// Create (or truncate) a file with `mode` and close it straight away.
    pub fn create_empty_file(path: &Path, mode: u32) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        options.open(path).map(drop)
    }

    /// Set permission bits. No-op on hosts without a POSIX mode.
    pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode))
        }
        #[cfg(not(unix))]
        {
            let _ = (path, mode);
            Ok(())
        }
    }

    /// Set access and modification time of a file or directory.
    pub fn set_times(path: &Path, time: FileTime) -> io::Result<()> {
        filetime::set_file_times(path, time, time)
    }

    /// `true` when the path (following links) can be stat'ed.
    pub fn exists(path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn ensure_dir_creates_ancestors_and_tolerates_existing() {
            let root = tempfile::tempdir().unwrap();
            let nested = root.path().join("a").join("b").join("c");
            ensure_dir(&nested, 0o755).unwrap();
            assert!(nested.is_dir());
            ensure_dir(&nested, 0o755).unwrap();
        }

        #[test]
        fn ensure_dir_rejects_empty_path() {
            let err = ensure_dir(Path::new(""), 0o755).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::NotFound);
        }

        #[test]
        fn create_empty_file_truncates() {
            let root = tempfile::tempdir().unwrap();
            let file = root.path().join("f.txt");
            fs::write(&file, "content").unwrap();
            create_empty_file(&file, 0o644).unwrap();
            assert_eq!(fs::metadata(&file).unwrap().len(), 0);
        }

        #[test]
        fn set_times_works_on_directories() {
            let root = tempfile::tempdir().unwrap();
            let time = FileTime::from_unix_time(1_704_105_000, 0);
            set_times(root.path(), time).unwrap();
            let meta = fs::metadata(root.path()).unwrap();
            assert_eq!(FileTime::from_last_modification_time(&meta), time);
        }

        #[cfg(unix)]
        #[test]
        fn set_mode_applies_bits() {
            use std::os::unix::fs::PermissionsExt;

            let root = tempfile::tempdir().unwrap();
            let file = root.path().join("m.txt");
            create_empty_file(&file, 0o644).unwrap();
            set_mode(&file, 0o600).unwrap();
            let mode = fs::metadata(&file).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
