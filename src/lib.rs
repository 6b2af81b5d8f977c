//! Docker asset generator for containerizing existing projects.
//!
//! The crate renders debug and release Dockerfiles, matching compose files
//! and helper scripts for a handful of runtime stacks, and patches the
//! project files some stacks keep runtime configuration in. The pieces:
//!
//! - [`config`]: the validated option record one run operates on
//! - [`emit`]: line-oriented Dockerfile and compose builders
//! - [`stack`]: per-runtime profiles that drive the emitters
//! - [`templates`]: embedded helper scripts and their substitution pass
//! - [`patch`]: idempotent, backup-first project file patching
//! - [`cli`]: argument parsing and the scaffold pipeline

pub mod cli;
pub mod config;
pub mod emit;
pub mod patch;
pub mod stack;
pub mod templates;

pub use config::{ScaffoldOptions, StackKind, Variant};
pub use emit::{ComposeBuilder, DockerfileBuilder};
pub use patch::{PatchError, PatchOutcome, PatchReport};
pub use stack::{profile_for, StackProfile};

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name from Cargo.toml.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_matches_package() {
        assert_eq!(NAME, "dockhand");
    }
}
