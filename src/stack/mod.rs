//! Stack profiles.
//!
//! One profile per target runtime. A profile is a pure computation over the
//! validated [`ScaffoldOptions`]: it resolves the concrete base image,
//! sequences the emitter calls for the Dockerfile and compose file of each
//! variant, and names the helper templates to copy. The only effectful
//! operation is `patch_project`, which runs the profile's manifest/source
//! patches strictly one after another and reports each outcome.

pub mod dotnet;
pub mod generic;
pub mod golang;
pub mod node;
pub mod python;

pub use dotnet::DotnetProfile;
pub use generic::GenericProfile;
pub use golang::GoProfile;
pub use node::NodeProfile;
pub use python::PythonProfile;

use crate::config::{ScaffoldOptions, StackKind, Variant};
use crate::emit::ComposeBuilder;
use crate::patch::PatchReport;
use crate::templates::TemplateSet;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait StackProfile: Send + Sync {
    fn kind(&self) -> StackKind;

    /// Concrete registry image reference for the variant being rendered.
    fn resolve_image_name(&self, variant: Variant) -> String;

    /// Dockerfile text for the variant.
    fn dockerfile(&self, variant: Variant) -> String;

    /// Compose file text for the variant.
    fn compose_file(&self, variant: Variant) -> String;

    /// Helper templates this stack ships with.
    fn template_set(&self) -> TemplateSet;

    /// Runs the stack's project-file patches, sequentially, against
    /// `project_dir`. Most stacks have none.
    async fn patch_project(&self, project_dir: &Path) -> Vec<PatchReport> {
        let _ = project_dir;
        Vec::new()
    }
}

/// Profile for the chosen stack kind.
pub fn profile_for(options: &ScaffoldOptions) -> Box<dyn StackProfile> {
    match options.stack {
        StackKind::Node => Box::new(NodeProfile::new(options.clone())),
        StackKind::Go => Box::new(GoProfile::new(options.clone())),
        StackKind::Dotnet => Box::new(DotnetProfile::new(options.clone())),
        StackKind::Python => Box::new(PythonProfile::new(options.clone())),
        StackKind::Generic => Box::new(GenericProfile::new(options.clone())),
    }
}

/// Compose assembly shared by every profile: service header, tagged image,
/// variant Dockerfile, build context, the web port when applicable, then the
/// stack's debug extras and the environment label.
pub(crate) fn standard_compose(
    options: &ScaffoldOptions,
    variant: Variant,
    extra_ports: &[String],
    volumes: &[String],
    environment: &[String],
) -> String {
    let mut builder = ComposeBuilder::new();
    builder
        .service_name(&options.service_name)
        .image(options.tagged_image_name(variant))
        .dockerfile(variant.dockerfile_name())
        .build_context(".");

    if options.is_web_project {
        let port = options.port_or_default();
        builder.port(format!("{}:{}", port, port));
    }
    for mapping in extra_ports {
        builder.port(mapping);
    }
    for mount in volumes {
        builder.volume(mount);
    }
    builder.label(format!(
        "com.{}.environment: \"{}\"",
        options.image_name,
        variant.environment()
    ));
    for variable in environment {
        builder.environment(variable);
    }

    builder.render()
}


#[cfg(test)]
mod tests {
    use super::test_support::options;
    use super::*;

    #[test]
    fn test_profile_for_matches_stack_kind() {
        for kind in [
            StackKind::Node,
            StackKind::Go,
            StackKind::Dotnet,
            StackKind::Python,
            StackKind::Generic,
        ] {
            let profile = profile_for(&options(kind, "base", true));
            assert_eq!(profile.kind(), kind);
        }
    }

    #[test]
    fn test_every_profile_emits_exactly_one_from_line() {
        for kind in [
            StackKind::Node,
            StackKind::Go,
            StackKind::Dotnet,
            StackKind::Python,
            StackKind::Generic,
        ] {
            for is_web in [true, false] {
                let opts = options(kind, "somebase", is_web);
                let profile = profile_for(&opts);
                for variant in [Variant::Debug, Variant::Release] {
                    let dockerfile = profile.dockerfile(variant);
                    let from_lines: Vec<_> = dockerfile
                        .lines()
                        .filter(|l| l.starts_with("FROM "))
                        .collect();
                    assert_eq!(from_lines.len(), 1, "{kind} {variant:?}");
                    assert_eq!(
                        from_lines[0],
                        format!("FROM {}", profile.resolve_image_name(variant))
                    );
                    // EXPOSE tracks the web flag on every stack.
                    assert_eq!(
                        dockerfile.contains("EXPOSE 3000"),
                        is_web,
                        "{kind} {variant:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_standard_compose_release_shape() {
        let opts = options(StackKind::Go, "golang", true);
        let rendered = standard_compose(&opts, Variant::Release, &[], &[], &[]);
        assert!(rendered.starts_with("testimagename:\n"));
        assert!(rendered.contains("  image: testimagename\n"));
        assert!(rendered.contains("  dockerfile: Dockerfile\n"));
        assert!(rendered.contains("    - \"3000:3000\"\n"));
        assert!(rendered.contains("com.testimagename.environment: \"release\""));
    }

    #[test]
    fn test_standard_compose_non_web_has_no_ports() {
        let opts = options(StackKind::Go, "golang", false);
        let rendered = standard_compose(&opts, Variant::Release, &[], &[], &[]);
        assert!(!rendered.contains("ports:"));
    }
}
