use std::path::{Path, PathBuf};

use tracing::debug;

/// First `<directory>/<base_name>_<NNNN>.<extension>` that does not exist yet.
///
/// Resolved once before a session starts so earlier sessions are never
/// overwritten; the suffix starts at `0000`.
pub fn sequenced_output_path(directory: &Path, base_name: &str, extension: &str) -> PathBuf {
    let extension = extension.trim_start_matches('.');
    let mut index = 0u32;
    loop {
        let candidate = directory.join(format!("{base_name}_{index:04}.{extension}"));
        if !candidate.exists() {
            debug!(path = %candidate.display(), "Resolved checkpoint path");
            return candidate;
        }
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_in_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            sequenced_output_path(dir.path(), "data", "h5"),
            dir.path().join("data_0000.h5")
        );
    }

    #[test]
    fn skips_existing_sessions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data_0000.h5"), b"").unwrap();
        std::fs::write(dir.path().join("data_0001.h5"), b"").unwrap();

        assert_eq!(
            sequenced_output_path(dir.path(), "data", "h5"),
            dir.path().join("data_0002.h5")
        );
    }

    #[test]
    fn other_bases_and_extensions_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run_0000.h5"), b"").unwrap();
        std::fs::write(dir.path().join("data_0000.tiff"), b"").unwrap();

        assert_eq!(
            sequenced_output_path(dir.path(), "data", ".h5"),
            dir.path().join("data_0000.h5")
        );
    }
}
