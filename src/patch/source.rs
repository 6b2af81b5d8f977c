//! Source entrypoint splice patcher.
//!
//! Ensures the host-builder call chain in `Program.cs` binds to the container
//! URLs. Detection is a substring search for the call signature and the edit
//! is an in-place text splice; full language parsing is deliberately out of
//! scope, but the operation runs through the shared engine so backups and
//! error reporting match the structured-manifest case.

use super::engine::{ensure_directive, PatchResult};
use std::path::Path;

/// Source file the web-framework profile patches.
pub const SOURCE_FILE: &str = "Program.cs";

/// Call signature whose presence makes the patch a no-op.
pub const URL_BINDING_SIGNATURE: &str = ".UseUrls(";

/// Construction call the binding is spliced after.
pub const HOST_BUILDER_ANCHOR: &str = "new WebHostBuilder()";

const URL_BINDING_NOTE: &str =
    "We noticed your Program.cs file didn't tell the web host which URLs to listen on. \
     We've fixed that for you.";

/// Ensures a `.UseUrls("http://*:<port>")` call directly follows the
/// host-builder construction.
pub async fn ensure_url_binding(source_path: &Path, port: u16) -> PatchResult {
    ensure_url_binding_after(source_path, HOST_BUILDER_ANCHOR, port).await
}

/// Same splice with a caller-chosen anchor.
pub async fn ensure_url_binding_after(
    source_path: &Path,
    anchor: &str,
    port: u16,
) -> PatchResult {
    let anchor = anchor.to_string();
    let insertion = format!(".UseUrls(\"http://*:{}\")", port);

    ensure_directive(
        source_path,
        URL_BINDING_NOTE,
        |text| Ok(text.to_string()),
        {
            let anchor = anchor.clone();
            move |text: &String| {
                if text.contains(URL_BINDING_SIGNATURE) {
                    Ok(true)
                } else if !text.contains(&anchor) {
                    Err(format!("could not find '{}'", anchor))
                } else {
                    Ok(false)
                }
            }
        },
        move |text: &mut String| {
            // Detection guaranteed the anchor is present.
            if let Some(at) = text.find(&anchor) {
                text.insert_str(at + anchor.len(), &insertion);
            }
        },
        |text: &String| Ok(text.clone()),
    )
    .await
}
