//! Shared patch pipeline.
//!
//! A patch walks the states Unread → Read → {KeyPresent, KeyAbsent} →
//! {Unchanged, Patched, Failed}. The pipeline is parameterized by four
//! closures (parse, detect, mutate, serialize) so the structured-manifest,
//! source-splice, and settings patchers all get identical backup and error
//! semantics. I/O is `tokio::fs`; each step suspends and the pipeline stops
//! at the first failure. There is no rollback: a write failure after a
//! successful backup leaves the backup in place and the original untouched.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Suffix appended to the patched file's name for the pre-patch copy.
pub const BACKUP_SUFFIX: &str = ".backup";

const UTF8_BOM: char = '\u{feff}';

/// Terminal outcome of a successful patch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The directive was already present; no files were touched.
    Unchanged,
    /// The directive was added. Carries a user-facing note describing what
    /// changed; a backup of the original exists next to the file.
    Patched(String),
}

/// Failure modes of a patch attempt. These are reported to the caller, never
/// retried; the user is expected to inspect the file and re-run.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Can't read {}. Make sure the file exists.", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Can't back up {}.", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't create {}.", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't write to {}.", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type PatchResult = Result<PatchOutcome, PatchError>;

/// Ensures a directive is present in an existing file.
///
/// * `parse` turns the BOM-stripped text into a document.
/// * `detect` reports whether the directive is already there (`Ok(true)` ends
///   the patch as `Unchanged`); it may fail when the file lacks the anchor the
///   patch needs, which surfaces as a parse error before any file is touched.
/// * `mutate` adds the missing directive.
/// * `serialize` renders the document back to text.
///
/// A missing or unreadable file is a `Read` error.
pub async fn ensure_directive<D, P, C, M, S>(
    path: &Path,
    note: &str,
    parse: P,
    detect: C,
    mutate: M,
    serialize: S,
) -> PatchResult
where
    P: FnOnce(&str) -> Result<D, String>,
    C: FnOnce(&D) -> Result<bool, String>,
    M: FnOnce(&mut D),
    S: FnOnce(&D) -> Result<String, String>,
{
    let original = fs::read_to_string(path).await.map_err(|source| PatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    apply(path, note, &original, true, parse, detect, mutate, serialize).await
}

/// Like [`ensure_directive`], but for a file that may not exist yet.
///
/// A missing containing directory is created, and a missing file starts from
/// the `baseline` document. The backup is only written when the file existed
/// before the patch.
pub async fn ensure_directive_creating<D, B, P, C, M, S>(
    path: &Path,
    note: &str,
    baseline: B,
    parse: P,
    detect: C,
    mutate: M,
    serialize: S,
) -> PatchResult
where
    B: FnOnce() -> D,
    P: FnOnce(&str) -> Result<D, String>,
    C: FnOnce(&D) -> Result<bool, String>,
    M: FnOnce(&mut D),
    S: FnOnce(&D) -> Result<String, String>,
{
    if let Some(parent) = path.parent() {
        if fs::metadata(parent).await.is_err() {
            debug!(dir = %parent.display(), "creating settings directory");
            fs::create_dir_all(parent)
                .await
                .map_err(|source| PatchError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
    }

    match fs::read_to_string(path).await {
        Ok(original) => apply(path, note, &original, true, parse, detect, mutate, serialize).await,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let mut doc = baseline();
            if already_present(path, &doc, detect)? {
                return Ok(PatchOutcome::Unchanged);
            }
            mutate(&mut doc);
            write_document(path, &doc, serialize).await?;
            Ok(PatchOutcome::Patched(note.to_string()))
        }
        Err(source) => Err(PatchError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[allow(clippy::too_many_arguments)]
async fn apply<D, P, C, M, S>(
    path: &Path,
    note: &str,
    original: &str,
    back_up: bool,
    parse: P,
    detect: C,
    mutate: M,
    serialize: S,
) -> PatchResult
where
    P: FnOnce(&str) -> Result<D, String>,
    C: FnOnce(&D) -> Result<bool, String>,
    M: FnOnce(&mut D),
    S: FnOnce(&D) -> Result<String, String>,
{
    let text = original.strip_prefix(UTF8_BOM).unwrap_or(original);

    let mut doc = parse(text).map_err(|reason| PatchError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    if already_present(path, &doc, detect)? {
        debug!(file = %path.display(), "directive already present, leaving file alone");
        return Ok(PatchOutcome::Unchanged);
    }

    if back_up {
        let backup_path = backup_path_for(path);
        fs::write(&backup_path, original)
            .await
            .map_err(|source| PatchError::Backup {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(backup = %backup_path.display(), "wrote pre-patch backup");
    }

    mutate(&mut doc);
    write_document(path, &doc, serialize).await?;
    Ok(PatchOutcome::Patched(note.to_string()))
}

fn already_present<D, C>(path: &Path, doc: &D, detect: C) -> Result<bool, PatchError>
where
    C: FnOnce(&D) -> Result<bool, String>,
{
    detect(doc).map_err(|reason| PatchError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

async fn write_document<D, S>(path: &Path, doc: &D, serialize: S) -> Result<(), PatchError>
where
    S: FnOnce(&D) -> Result<String, String>,
{
    let serialized = serialize(doc).map_err(|reason| PatchError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    fs::write(path, serialized)
        .await
        .map_err(|source| PatchError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// `<file><suffix>` next to the original.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn identity_parse(text: &str) -> Result<String, String> {
        Ok(text.to_string())
    }

    async fn ensure_marker(path: &Path) -> PatchResult {
        ensure_directive(
            path,
            "marker added",
            identity_parse,
            |text: &String| Ok(text.contains("marker")),
            |text: &mut String| text.push_str("marker\n"),
            |text: &String| Ok(text.clone()),
        )
        .await
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let result = ensure_marker(&dir.path().join("absent.txt")).await;
        assert!(matches!(result, Err(PatchError::Read { .. })));
    }

    #[tokio::test]
    async fn test_patch_then_unchanged_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "line\n").unwrap();

        let first = ensure_marker(&file).await.unwrap();
        assert_eq!(first, PatchOutcome::Patched("marker added".to_string()));
        let after_first = std::fs::read_to_string(&file).unwrap();

        let second = ensure_marker(&file).await.unwrap();
        assert_eq!(second, PatchOutcome::Unchanged);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_backup_matches_original_bytes() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "original contents\n").unwrap();

        ensure_marker(&file).await.unwrap();

        let backup = std::fs::read_to_string(dir.path().join("file.txt.backup")).unwrap();
        assert_eq!(backup, "original contents\n");
    }

    #[tokio::test]
    async fn test_unchanged_writes_no_backup() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "has marker already\n").unwrap();

        let result = ensure_marker(&file).await.unwrap();
        assert_eq!(result, PatchOutcome::Unchanged);
        assert!(!dir.path().join("file.txt.backup").exists());
    }

    #[tokio::test]
    async fn test_bom_is_stripped_before_detection() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "\u{feff}has marker already\n").unwrap();

        let result = ensure_marker(&file).await.unwrap();
        assert_eq!(result, PatchOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_failure_after_backup_leaves_original_untouched() {
        // A serialize failure hits after the backup step, standing in for the
        // manifest-write failure: the original must keep its bytes and the
        // backup must exist and match them.
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "original contents\n").unwrap();

        let result = ensure_directive(
            &file,
            "never reported",
            identity_parse,
            |_: &String| Ok(false),
            |text: &mut String| text.push_str("marker\n"),
            |_: &String| Err("serialize failed".to_string()),
        )
        .await;

        assert!(matches!(result, Err(PatchError::Parse { .. })));
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "original contents\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("file.txt.backup")).unwrap(),
            "original contents\n"
        );
    }

    #[tokio::test]
    async fn test_detect_failure_reports_parse_error_without_backup() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "no anchor here\n").unwrap();

        let result = ensure_directive(
            &file,
            "unused",
            identity_parse,
            |_: &String| Err("anchor not found".to_string()),
            |_: &mut String| {},
            |text: &String| Ok(text.clone()),
        )
        .await;

        assert!(matches!(result, Err(PatchError::Parse { .. })));
        assert!(!dir.path().join("file.txt.backup").exists());
    }

    #[tokio::test]
    async fn test_creating_variant_materializes_dir_and_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("nested").join("file.txt");

        let result = ensure_directive_creating(
            &file,
            "created",
            String::new,
            identity_parse,
            |text: &String| Ok(text.contains("marker")),
            |text: &mut String| text.push_str("marker\n"),
            |text: &String| Ok(text.clone()),
        )
        .await
        .unwrap();

        assert_eq!(result, PatchOutcome::Patched("created".to_string()));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "marker\n");
        // The file did not exist, so there is nothing to back up.
        assert!(!dir.path().join("nested").join("file.txt.backup").exists());
    }
}
