//! Scaffold options and validation.
//!
//! `ScaffoldOptions` is the single immutable record of user answers for one
//! generator run. The CLI layer constructs and validates it once, then threads
//! it read-only through the stack profiles and patchers; nothing in the core
//! mutates it or stores it in shared state.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Default port offered for web projects.
pub const DEFAULT_PORT: u16 = 3000;

/// Target runtime for the generated scaffolding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StackKind {
    Node,
    Go,
    /// Legacy web-framework project (generation selected from the base image).
    Dotnet,
    Python,
    Generic,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StackKind::Node => "node",
            StackKind::Go => "go",
            StackKind::Dotnet => "dotnet",
            StackKind::Python => "python",
            StackKind::Generic => "generic",
        };
        write!(f, "{}", name)
    }
}

/// Which of the two rendered output variants is being produced. The generator
/// always renders both; this selects the one a single render call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Debug,
    Release,
}

impl Variant {
    /// Dockerfile name for this variant.
    pub fn dockerfile_name(&self) -> &'static str {
        match self {
            Variant::Debug => "Dockerfile.debug",
            Variant::Release => "Dockerfile",
        }
    }

    /// Compose file name for this variant.
    pub fn compose_file_name(&self) -> &'static str {
        match self {
            Variant::Debug => "docker-compose.debug.yml",
            Variant::Release => "docker-compose.yml",
        }
    }

    /// Environment label value embedded in the compose file.
    pub fn environment(&self) -> &'static str {
        match self {
            Variant::Debug => "debug",
            Variant::Release => "release",
        }
    }
}

/// Validation errors for scaffold options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Image name must not be empty")]
    EmptyImageName,

    #[error("Image name '{0}' may only contain lowercase letters, digits, '_', '-', '.', ':' and '/'")]
    InvalidImageName(String),

    #[error("Service name '{0}' may only contain letters, digits, '_' and '-'")]
    InvalidServiceName(String),

    #[error("Project name must not be empty")]
    EmptyProjectName,

    #[error("Port number is required for web projects")]
    MissingPort,

    #[error("Port number must be between 1 and 65535")]
    InvalidPort,

    #[error("Base image identifier must not be empty")]
    EmptyBaseImage,
}

/// Immutable record of the answers one generator run operates on.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub stack: StackKind,

    /// Logical base image identifier (e.g. `node:argon`, `dotnet:1.0.0-preview2-sdk`).
    /// Profiles resolve it to a concrete registry reference.
    pub base_image: String,

    /// Host/container port; only meaningful when `is_web_project`.
    pub port: Option<u16>,

    /// Image name for the built container image.
    pub image_name: String,

    /// Compose service name.
    pub service_name: String,

    /// Project name, used for paths baked into the Dockerfile (Go import
    /// path, published .dll name). Sanitized to alphanumeric by the CLI.
    pub project_name: String,

    pub is_web_project: bool,
}

impl ScaffoldOptions {
    /// Checks the identifier and port constraints the emitters rely on.
    /// Profiles treat invalid options as a caller contract violation, so this
    /// is the only gate.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.image_name.is_empty() {
            return Err(OptionsError::EmptyImageName);
        }
        if !self
            .image_name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_-./:".contains(c))
        {
            return Err(OptionsError::InvalidImageName(self.image_name.clone()));
        }
        if self.service_name.is_empty()
            || !self
                .service_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(OptionsError::InvalidServiceName(self.service_name.clone()));
        }
        if self.project_name.is_empty() {
            return Err(OptionsError::EmptyProjectName);
        }
        if self.base_image.is_empty() {
            return Err(OptionsError::EmptyBaseImage);
        }
        if self.is_web_project {
            match self.port {
                None => return Err(OptionsError::MissingPort),
                Some(0) => return Err(OptionsError::InvalidPort),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Port for rendering; profiles only ask after `validate()` passed, so a
    /// missing port on a non-web project falls back to the default.
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Image reference with the `:debug` tag applied for debug renders.
    pub fn tagged_image_name(&self, variant: Variant) -> String {
        match variant {
            Variant::Debug => format!("{}:debug", self.image_name),
            Variant::Release => self.image_name.clone(),
        }
    }
}

/// Strips everything but alphanumerics, the constraint compose project names
/// carry. Applied by the CLI before options reach the core.
pub fn sanitize_project_name(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
