//! Idempotent file patchers.
//!
//! All patchers share one asynchronous pipeline (read, strip BOM, parse,
//! detect, back up, mutate, write) implemented in [`engine`] and specialized
//! three ways: structured JSON manifests ([`manifest`]), substring splices
//! into source files ([`source`]), and the editor settings file that may not
//! exist yet ([`settings`]). Every patch that rewrites an existing file first
//! copies it byte-for-byte to `<name>.backup`.

pub mod engine;
pub mod manifest;
pub mod settings;
pub mod source;

pub use engine::{PatchError, PatchOutcome, PatchResult, BACKUP_SUFFIX};

/// One patch attempt and its outcome, handed back to the CLI for display.
#[derive(Debug)]
pub struct PatchReport {
    /// File the patch targeted, relative to the project directory.
    pub target: String,
    pub result: PatchResult,
}

impl PatchReport {
    pub fn new(target: impl Into<String>, result: PatchResult) -> Self {
        Self {
            target: target.into(),
            result,
        }
    }
}
