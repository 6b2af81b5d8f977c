//! JSON manifest patchers for `project.json`.
//!
//! Two directives are ensured here: the legacy `commands.web` startup command
//! and the newer `buildOptions`/`publishOptions` keys that make `dotnet
//! publish` carry the generated docker files along. Documents are read into
//! `serde_json::Value`, mutated minimally, and written back; unknown keys are
//! preserved in place.

use super::engine::{ensure_directive, PatchResult};
use serde_json::{json, Map, Value};
use std::path::Path;

/// Manifest file the web-framework profiles patch.
pub const MANIFEST_FILE: &str = "project.json";

const WEB_COMMAND_NOTE: &str =
    "We noticed your project.json file didn't know how to start the web server. \
     We've fixed that for you.";

const PUBLISH_OPTIONS_NOTE: &str =
    "We noticed your project.json file wasn't publishing the generated docker files. \
     We've fixed that for you.";

/// Docker files `dotnet publish` must carry along.
const PUBLISHED_FILES: [&str; 4] = [
    "Dockerfile",
    "Dockerfile.debug",
    "docker-compose.yml",
    "docker-compose.debug.yml",
];

/// Startup command wired into `commands.web` for the legacy generation.
pub fn kestrel_command(port: u16) -> String {
    format!(
        "Microsoft.AspNet.Hosting --server Microsoft.AspNet.Server.Kestrel \
         --server.urls http://*:{}",
        port
    )
}

/// Ensures `commands.<key>` exists, setting it to `value` when absent.
/// The manifest is written back compact, single line, no trailing newline.
pub async fn ensure_command(manifest_path: &Path, key: &str, value: &str) -> PatchResult {
    let key = key.to_string();
    let value = value.to_string();
    ensure_directive(
        manifest_path,
        WEB_COMMAND_NOTE,
        parse_json,
        {
            let key = key.clone();
            move |doc: &Value| Ok(doc.get("commands").and_then(|c| c.get(&key)).is_some())
        },
        move |doc: &mut Value| {
            let commands = entry_object(doc, "commands");
            commands.insert(key, Value::String(value));
        },
        serialize_compact,
    )
    .await
}

/// Ensures `buildOptions.debugType` is `"portable"` and `publishOptions.include`
/// lists the generated docker files. Written back pretty-printed; unrelated
/// keys and existing include entries are left alone.
pub async fn ensure_publish_options(manifest_path: &Path) -> PatchResult {
    ensure_directive(
        manifest_path,
        PUBLISH_OPTIONS_NOTE,
        parse_json,
        |doc: &Value| Ok(has_debug_type(doc) && has_published_files(doc)),
        |doc: &mut Value| {
            let build_options = entry_object(doc, "buildOptions");
            build_options
                .entry("debugType".to_string())
                .or_insert_with(|| Value::String("portable".to_string()));

            let publish_options = entry_object(doc, "publishOptions");
            let include = publish_options
                .entry("include".to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(entries) = include {
                for file in PUBLISHED_FILES {
                    if !entries.iter().any(|e| e == file) {
                        entries.push(Value::String(file.to_string()));
                    }
                }
            }
        },
        serialize_pretty,
    )
    .await
}

fn parse_json(text: &str) -> Result<Value, String> {
    serde_json::from_str(text).map_err(|err| err.to_string())
}

fn serialize_compact(doc: &Value) -> Result<String, String> {
    serde_json::to_string(doc).map_err(|err| err.to_string())
}

fn serialize_pretty(doc: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(doc).map_err(|err| err.to_string())
}

fn has_debug_type(doc: &Value) -> bool {
    doc.get("buildOptions")
        .and_then(|b| b.get("debugType"))
        .is_some()
}

fn has_published_files(doc: &Value) -> bool {
    match doc.get("publishOptions").and_then(|p| p.get("include")) {
        Some(Value::Array(entries)) => {
            PUBLISHED_FILES.iter().all(|file| entries.iter().any(|e| e == file))
        }
        _ => false,
    }
}

/// Navigates to a top-level object, creating it when missing. A non-object
/// value under the key is replaced; everything else in the document stays.
fn entry_object<'a>(doc: &'a mut Value, key: &str) -> &'a mut Map<String, Value> {
    if !doc.is_object() {
        *doc = json!({});
    }
    let map = doc.as_object_mut().expect("document was just made an object");
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut().expect("slot was just made an object")
}
