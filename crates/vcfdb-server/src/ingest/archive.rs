//! Moving source files between the intake and processed areas

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Move `file` into `dir`, keeping its name. Returns the new path.
///
/// Tries a rename first and falls back to copy-then-remove, which covers
/// directories on different filesystems. An existing file of the same name in
/// `dir` is replaced.
pub async fn move_into(file: &Path, dir: &Path) -> io::Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", file.display()),
        )
    })?;
    let target = dir.join(name);

    match tokio::fs::rename(file, &target).await {
        Ok(()) => Ok(target),
        Err(rename_err) => {
            debug!(
                file = %file.display(),
                target = %target.display(),
                error = %rename_err,
                "Rename failed, falling back to copy"
            );
            tokio::fs::copy(file, &target).await?;
            tokio::fs::remove_file(file).await?;
            Ok(target)
        }
    }
}

/// Like [`move_into`], but fails with [`io::ErrorKind::AlreadyExists`] instead
/// of replacing a file of the same name in `dir`. Nothing is moved then.
pub async fn move_into_new(file: &Path, dir: &Path) -> io::Result<PathBuf> {
    if let Some(name) = file.file_name() {
        let target = dir.join(name);
        if tokio::fs::try_exists(&target).await? {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", target.display()),
            ));
        }
    }

    move_into(file, dir).await
}

/// Files directly inside `dir` with the given extension, sorted by name.
/// Sub-directories are not descended into.
pub async fn list_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_move_into() {
        let tmp = TempDir::new().unwrap();
        let raw = tmp.path().join("raw");
        let processed = tmp.path().join("processed");
        std::fs::create_dir_all(&raw).unwrap();
        std::fs::create_dir_all(&processed).unwrap();

        let source = raw.join("s1.vcf");
        std::fs::write(&source, "content").unwrap();

        let target = move_into(&source, &processed).await.unwrap();

        assert_eq!(target, processed.join("s1.vcf"));
        assert!(!source.exists());
        assert_eq!(std::fs::read_to_string(target).unwrap(), "content");
    }

    #[tokio::test]
    async fn test_move_into_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("s1.vcf");
        std::fs::write(&source, "content").unwrap();

        assert!(move_into(&source, &tmp.path().join("nope")).await.is_err());
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_move_into_new_keeps_existing_target() {
        let tmp = TempDir::new().unwrap();
        let processed = tmp.path().join("processed");
        let raw = tmp.path().join("raw");
        std::fs::create_dir_all(&processed).unwrap();
        std::fs::create_dir_all(&raw).unwrap();

        let source = processed.join("s1.vcf");
        std::fs::write(&source, "old").unwrap();
        std::fs::write(raw.join("s1.vcf"), "pending").unwrap();

        let err = move_into_new(&source, &raw).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read_to_string(raw.join("s1.vcf")).unwrap(), "pending");
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "old");
    }

    #[tokio::test]
    async fn test_list_files_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.vcf", "a.vcf", "notes.txt", "c.vcf.gz"] {
            std::fs::write(tmp.path().join(name), "").unwrap();
        }
        std::fs::create_dir(tmp.path().join("nested.vcf")).unwrap();

        let files = list_files(tmp.path(), "vcf").await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.vcf", "b.vcf"]);
    }
}
