//! Web-framework (.NET) profile.
//!
//! The framework went through incompatible tooling generations, selected here
//! from the logical base-image identifier: the RC1 generation runs straight
//! from sources with `dnx` and needs a `commands.web` entry in the project
//! manifest, while the later generations run a published .dll and need the
//! generated docker files listed in the manifest's publish options plus a
//! `.UseUrls` binding in the program entrypoint. Image resolution goes
//! through an explicit lookup table because two identifiers do not map
//! one-to-one onto registry tags: the retired `rc1-final` tag resolves to the
//! backward-compatible `rc1-update1` image, and the sdk-flavored identifiers
//! resolve to slim runtime images for release builds.

use super::{standard_compose, StackProfile};
use crate::config::{ScaffoldOptions, StackKind, Variant};
use crate::emit::DockerfileBuilder;
use crate::patch::{manifest, source, PatchReport};
use crate::templates::TemplateSet;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// (identifier, debug image, release image). Identifiers missing from the
/// table resolve to `microsoft/<identifier>` for both variants.
const IMAGE_TABLE: &[(&str, &str, &str)] = &[
    (
        "aspnet:1.0.0-rc1-update1",
        "microsoft/aspnet:1.0.0-rc1-update1",
        "microsoft/aspnet:1.0.0-rc1-update1",
    ),
    // Retired tag; update1 is its backward-compatible replacement.
    (
        "aspnet:1.0.0-rc1-final",
        "microsoft/aspnet:1.0.0-rc1-update1",
        "microsoft/aspnet:1.0.0-rc1-update1",
    ),
    (
        "dotnet:1.0.0-preview1",
        "microsoft/dotnet:1.0.0-preview1",
        "microsoft/dotnet:1.0.0-rc2-core",
    ),
    (
        "dotnet:1.0.0-preview2-sdk",
        "microsoft/dotnet:1.0.0-preview2-sdk",
        "microsoft/dotnet:1.0.0-core",
    ),
];

/// Tooling generation, derived from the base-image identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Generation {
    /// Source-based: `dnu restore` at build time, `dnx` at run time.
    Rc1,
    /// First dll-based generation; still needs the `.UseUrls` binding.
    Rc2,
    /// Final tooling; URL binding comes from the publish pipeline.
    Rtm,
}

fn generation_of(base_image: &str) -> Generation {
    if base_image.starts_with("aspnet:1.0.0-rc1") {
        Generation::Rc1
    } else if base_image == "dotnet:1.0.0-preview1" {
        Generation::Rc2
    } else {
        Generation::Rtm
    }
}

pub struct DotnetProfile {
    options: ScaffoldOptions,
    generation: Generation,
}

impl DotnetProfile {
    pub fn new(options: ScaffoldOptions) -> Self {
        let generation = generation_of(&options.base_image);
        debug!(base_image = %options.base_image, ?generation, "selected tooling generation");
        Self {
            options,
            generation,
        }
    }

    fn dll_entrypoint(&self, variant: Variant) -> String {
        let dll = format!("{}.dll", self.options.project_name);
        match variant {
            Variant::Debug => format!(
                "[\"/bin/bash\", \"-c\", \"if [ -z \\\"$REMOTE_DEBUGGING\\\" ]; \
                 then dotnet {}; else sleep infinity; fi\"]",
                dll
            ),
            Variant::Release => format!("[\"dotnet\", \"{}\"]", dll),
        }
    }
}

#[async_trait]
impl StackProfile for DotnetProfile {
    fn kind(&self) -> StackKind {
        StackKind::Dotnet
    }

    fn resolve_image_name(&self, variant: Variant) -> String {
        for (identifier, debug_image, release_image) in IMAGE_TABLE {
            if *identifier == self.options.base_image {
                return match variant {
                    Variant::Debug => debug_image.to_string(),
                    Variant::Release => release_image.to_string(),
                };
            }
        }
        format!("microsoft/{}", self.options.base_image)
    }

    fn dockerfile(&self, variant: Variant) -> String {
        let mut builder = DockerfileBuilder::new();
        builder
            .from_image(self.resolve_image_name(variant))
            .copy(". /app")
            .workdir("/app");

        if self.generation == Generation::Rc1 {
            builder.run("[\"dnu\", \"restore\"]");
        }
        if self.options.is_web_project {
            builder.expose(self.options.port_or_default());
        }

        match self.generation {
            Generation::Rc1 => {
                builder.entrypoint("[\"dnx\", \"-p\", \"project.json\", \"web\"]");
            }
            Generation::Rc2 | Generation::Rtm => {
                builder.entrypoint(self.dll_entrypoint(variant));
            }
        }

        builder.render()
    }

    fn compose_file(&self, variant: Variant) -> String {
        let remote_debugging =
            variant == Variant::Debug && self.generation != Generation::Rc1;
        let environment = if remote_debugging {
            vec!["REMOTE_DEBUGGING".to_string()]
        } else {
            Vec::new()
        };
        standard_compose(&self.options, variant, &[], &[], &environment)
    }

    fn template_set(&self) -> TemplateSet {
        match self.generation {
            Generation::Rc1 => TemplateSet::generic(),
            Generation::Rc2 | Generation::Rtm => TemplateSet::dotnet(),
        }
    }

    async fn patch_project(&self, project_dir: &Path) -> Vec<PatchReport> {
        let mut reports = Vec::new();
        let manifest_path = project_dir.join(manifest::MANIFEST_FILE);

        match self.generation {
            Generation::Rc1 => {
                if self.options.is_web_project {
                    let command = manifest::kestrel_command(self.options.port_or_default());
                    let result = manifest::ensure_command(&manifest_path, "web", &command).await;
                    reports.push(PatchReport::new(manifest::MANIFEST_FILE, result));
                }
            }
            Generation::Rc2 => {
                let result = manifest::ensure_publish_options(&manifest_path).await;
                reports.push(PatchReport::new(manifest::MANIFEST_FILE, result));

                // Only after the manifest patch finished; never concurrent
                // against the same project directory.
                if self.options.is_web_project {
                    let source_path = project_dir.join(source::SOURCE_FILE);
                    let result =
                        source::ensure_url_binding(&source_path, self.options.port_or_default())
                            .await;
                    reports.push(PatchReport::new(source::SOURCE_FILE, result));
                }
            }
            Generation::Rtm => {
                let result = manifest::ensure_publish_options(&manifest_path).await;
                reports.push(PatchReport::new(manifest::MANIFEST_FILE, result));
            }
        }

        reports
    }
}
