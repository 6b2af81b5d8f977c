//! Python profile.
//!
//! Rides on the `onbuild` base image, which copies the source tree and
//! installs requirements during the build, so the Dockerfile itself stays
//! nearly empty.

use super::{standard_compose, StackProfile};
use crate::config::{ScaffoldOptions, StackKind, Variant};
use crate::emit::DockerfileBuilder;
use crate::templates::TemplateSet;

pub struct PythonProfile {
    options: ScaffoldOptions,
}

impl PythonProfile {
    pub fn new(options: ScaffoldOptions) -> Self {
        Self { options }
    }
}

impl StackProfile for PythonProfile {
    fn kind(&self) -> StackKind {
        StackKind::Python
    }

    fn resolve_image_name(&self, _variant: Variant) -> String {
        self.options.base_image.clone()
    }

    fn dockerfile(&self, variant: Variant) -> String {
        let mut builder = DockerfileBuilder::new();
        builder.from_image(self.resolve_image_name(variant));
        if self.options.is_web_project {
            builder.expose(self.options.port_or_default());
        }
        builder.cmd("[\"python\", \"app.py\"]");
        builder.render()
    }

    fn compose_file(&self, variant: Variant) -> String {
        standard_compose(&self.options, variant, &[], &[], &[])
    }

    fn template_set(&self) -> TemplateSet {
        TemplateSet::generic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::test_support::options;

    #[test]
    fn test_dockerfile_relies_on_onbuild_image() {
        let profile = PythonProfile::new(options(StackKind::Python, "python:3-onbuild", true));
        let dockerfile = profile.dockerfile(Variant::Release);
        assert_eq!(
            dockerfile,
            "FROM python:3-onbuild\nEXPOSE 3000\nCMD [\"python\", \"app.py\"]\n"
        );
    }

    #[test]
    fn test_non_web_dockerfile_skips_expose() {
        let profile = PythonProfile::new(options(StackKind::Python, "python:3-onbuild", false));
        assert!(!profile.dockerfile(Variant::Debug).contains("EXPOSE"));
    }
}
