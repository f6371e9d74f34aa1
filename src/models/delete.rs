//! Deletion of a whole model group

use super::infer::{GGUF_SUFFIX, METADATA_SUFFIX};
use super::types::ModelGroup;
use crate::error::{JanitorError, JanitorResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Remove a file, treating "already gone" as success
async fn remove_if_present(path: &Path) -> JanitorResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = ?path, "File already deleted");
            Ok(())
        }
        Err(e) => Err(JanitorError::io(path, e)),
    }
}

/// Sidecar path beside an artifact (`<path>.json`)
fn sidecar_path(path: &Path) -> PathBuf {
    let mut sidecar = path.as_os_str().to_owned();
    sidecar.push(METADATA_SUFFIX);
    PathBuf::from(sidecar)
}

/// Delete every file of a group, stopping at the first hard error
///
/// GGUF files also lose their `<file>.gguf.json` sidecar; a missing or
/// undeletable sidecar is ignored. Files removed before a failure stay removed.
/// Paths are used as given and not checked against the cache roots.
pub async fn try_delete_group(group: &ModelGroup) -> JanitorResult<()> {
    for file in &group.files {
        remove_if_present(&file.path).await?;

        if file.name.ends_with(GGUF_SUFFIX) {
            let sidecar = sidecar_path(&file.path);
            if let Err(e) = fs::remove_file(&sidecar).await
                && e.kind() != ErrorKind::NotFound
            {
                tracing::debug!(path = ?sidecar, error = %e, "Could not delete sidecar");
            }
        }

        tracing::debug!(path = ?file.path, "Deleted model file");
    }

    Ok(())
}

/// Delete a group, reporting only whether it fully succeeded
pub async fn delete_group(group: &ModelGroup) -> bool {
    match try_delete_group(group).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(group = %group.id, error = %e, "Failed to delete model group");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::group::group_files;
    use crate::models::scanner::{LlamaCppScanner, Scanner};
    use crate::models::types::ModelSource;
    use tempfile::TempDir;

    async fn llamacpp_groups(root: &Path) -> Vec<ModelGroup> {
        group_files(LlamaCppScanner.scan(root).await, ModelSource::LlamaCpp)
    }

    #[tokio::test]
    async fn test_deletes_file_and_sidecar() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("m.gguf"), b"gguf").unwrap();
        std::fs::write(
            dir.path().join("m.gguf.json"),
            r#"{"url": "https://huggingface.co/a/b/resolve/main/m.gguf"}"#,
        )
        .unwrap();

        let groups = llamacpp_groups(dir.path()).await;
        assert_eq!(groups.len(), 1);

        assert!(delete_group(&groups[0]).await);
        assert!(!dir.path().join("m.gguf").exists());
        assert!(!dir.path().join("m.gguf.json").exists());
    }

    #[tokio::test]
    async fn test_missing_sidecar_still_succeeds() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("solo.gguf"), b"gguf").unwrap();

        let groups = llamacpp_groups(dir.path()).await;
        assert!(delete_group(&groups[0]).await);
        assert!(!dir.path().join("solo.gguf").exists());
    }

    #[tokio::test]
    async fn test_already_deleted_file_is_success() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("gone.gguf"), b"gguf").unwrap();

        let groups = llamacpp_groups(dir.path()).await;
        std::fs::remove_file(dir.path().join("gone.gguf")).unwrap();

        assert!(delete_group(&groups[0]).await);
    }

    #[tokio::test]
    async fn test_hard_error_short_circuits() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.gguf"), b"a").unwrap();
        std::fs::write(dir.path().join("b.gguf"), b"b").unwrap();

        let mut group = llamacpp_groups(dir.path()).await.remove(0);
        let mut second = llamacpp_groups(dir.path()).await.remove(1);
        let untouched = second.files[0].path.clone();
        // A directory at a file path cannot be unlinked
        let blocker = dir.path().join("blocker");
        std::fs::create_dir(&blocker).unwrap();
        group.files[0].path = blocker.clone();
        group.files.append(&mut second.files);

        assert!(!delete_group(&group).await);
        assert!(blocker.exists());
        assert!(untouched.exists());
        let err = try_delete_group(&group).await.unwrap_err();
        assert!(matches!(err, JanitorError::Io { .. }));
    }
}
