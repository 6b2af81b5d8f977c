//! Editor settings patcher.
//!
//! Makes sure `.vscode/settings.json` maps `dockerfile.*` files to the
//! dockerfile language so the generated `Dockerfile.debug` gets highlighting.
//! The settings file (and its directory) may not exist yet; both are created
//! on demand, and a backup is only taken when a file was actually there.
//! The directive is a two-level key: both `files.associations` and its
//! `dockerfile.*` entry must match for the file to count as already patched,
//! and patching creates intermediate levels without disturbing unrelated
//! sub-keys.

use super::engine::{ensure_directive_creating, PatchResult};
use serde_json::{Map, Value};
use std::path::Path;

/// Directory holding editor configuration, relative to the project root.
pub const SETTINGS_DIR: &str = ".vscode";

/// Settings file name inside [`SETTINGS_DIR`].
pub const SETTINGS_FILE: &str = "settings.json";

const ASSOCIATIONS_KEY: &str = "files.associations";
const PATTERN_KEY: &str = "dockerfile.*";
const LANGUAGE: &str = "dockerfile";

const ASSOCIATION_NOTE: &str =
    "We noticed your settings.json file didn't consider Dockerfile.debug a dockerfile, \
     we fixed that for you.";

/// Ensures the dockerfile file-association mapping in the project's editor
/// settings, creating `.vscode/` and `settings.json` when absent.
pub async fn ensure_dockerfile_association(project_dir: &Path) -> PatchResult {
    let settings_path = project_dir.join(SETTINGS_DIR).join(SETTINGS_FILE);

    ensure_directive_creating(
        &settings_path,
        ASSOCIATION_NOTE,
        || Value::Object(Map::new()),
        |text| serde_json::from_str(text).map_err(|err| err.to_string()),
        |doc: &Value| {
            let mapped = doc
                .get(ASSOCIATIONS_KEY)
                .and_then(|a| a.get(PATTERN_KEY))
                .and_then(Value::as_str)
                == Some(LANGUAGE);
            Ok(mapped)
        },
        |doc: &mut Value| {
            if !doc.is_object() {
                *doc = Value::Object(Map::new());
            }
            let map = doc.as_object_mut().expect("settings document is an object");
            let associations = map
                .entry(ASSOCIATIONS_KEY.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !associations.is_object() {
                *associations = Value::Object(Map::new());
            }
            associations
                .as_object_mut()
                .expect("associations was just made an object")
                .insert(PATTERN_KEY.to_string(), Value::String(LANGUAGE.to_string()));
        },
        |doc: &Value| serde_json::to_string_pretty(doc).map_err(|err| err.to_string()),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::engine::PatchOutcome;
    use tempfile::TempDir;

    fn settings_path(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join(SETTINGS_DIR).join(SETTINGS_FILE)
    }

    #[tokio::test]
    async fn test_creates_dir_and_file_when_neither_exists() {
        let dir = TempDir::new().unwrap();

        let outcome = ensure_dockerfile_association(dir.path()).await.unwrap();
        assert!(matches!(outcome, PatchOutcome::Patched(_)));

        let contents = std::fs::read_to_string(settings_path(&dir)).unwrap();
        assert!(contents.contains("\"dockerfile.*\": \"dockerfile\""));
        assert!(!dir
            .path()
            .join(SETTINGS_DIR)
            .join("settings.json.backup")
            .exists());
    }

    #[tokio::test]
    async fn test_creates_file_when_dir_exists() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(SETTINGS_DIR)).unwrap();

        let outcome = ensure_dockerfile_association(dir.path()).await.unwrap();
        assert!(matches!(outcome, PatchOutcome::Patched(_)));
        assert!(settings_path(&dir).exists());
    }

    #[tokio::test]
    async fn test_existing_mapping_is_unchanged() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(SETTINGS_DIR)).unwrap();
        let contents = r#"{"files.associations":{"dockerfile.*":"dockerfile"}}"#;
        std::fs::write(settings_path(&dir), contents).unwrap();

        let outcome = ensure_dockerfile_association(dir.path()).await.unwrap();
        assert_eq!(outcome, PatchOutcome::Unchanged);
        assert_eq!(
            std::fs::read_to_string(settings_path(&dir)).unwrap(),
            contents
        );
    }

    #[tokio::test]
    async fn test_partial_mapping_is_completed_with_backup() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(SETTINGS_DIR)).unwrap();
        std::fs::write(
            settings_path(&dir),
            r#"{"files.associations":{"*.yml":"yaml"},"editor.tabSize":2}"#,
        )
        .unwrap();

        let outcome = ensure_dockerfile_association(dir.path()).await.unwrap();
        assert!(matches!(outcome, PatchOutcome::Patched(_)));

        let doc: Value =
            serde_json::from_str(&std::fs::read_to_string(settings_path(&dir)).unwrap()).unwrap();
        // Both the pre-existing association and the unrelated setting survive.
        assert_eq!(doc["files.associations"]["*.yml"], "yaml");
        assert_eq!(doc["files.associations"]["dockerfile.*"], "dockerfile");
        assert_eq!(doc["editor.tabSize"], 2);
        assert!(dir
            .path()
            .join(SETTINGS_DIR)
            .join("settings.json.backup")
            .exists());
    }

    #[tokio::test]
    async fn test_wrong_association_value_gets_rewritten() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(SETTINGS_DIR)).unwrap();
        std::fs::write(
            settings_path(&dir),
            r#"{"files.associations":{"dockerfile.*":"plaintext"}}"#,
        )
        .unwrap();

        let outcome = ensure_dockerfile_association(dir.path()).await.unwrap();
        assert!(matches!(outcome, PatchOutcome::Patched(_)));

        let doc: Value =
            serde_json::from_str(&std::fs::read_to_string(settings_path(&dir)).unwrap()).unwrap();
        assert_eq!(doc["files.associations"]["dockerfile.*"], "dockerfile");
    }

    #[tokio::test]
    async fn test_bom_settings_file_is_handled() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(SETTINGS_DIR)).unwrap();
        std::fs::write(
            settings_path(&dir),
            "\u{feff}{\"files.associations\":{\"dockerfile.*\":\"dockerfile\"}}",
        )
        .unwrap();

        let outcome = ensure_dockerfile_association(dir.path()).await.unwrap();
        assert_eq!(outcome, PatchOutcome::Unchanged);
    }
}
