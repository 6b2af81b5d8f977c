//! Go profile.
//!
//! The source tree is copied into the image's GOPATH under the project name
//! and installed with the toolchain; debug and release differ only in image
//! tag and compose labeling.

use super::{standard_compose, StackProfile};
use crate::config::{ScaffoldOptions, StackKind, Variant};
use crate::emit::DockerfileBuilder;
use crate::templates::TemplateSet;

pub struct GoProfile {
    options: ScaffoldOptions,
}

impl GoProfile {
    pub fn new(options: ScaffoldOptions) -> Self {
        Self { options }
    }
}

impl StackProfile for GoProfile {
    fn kind(&self) -> StackKind {
        StackKind::Go
    }

    fn resolve_image_name(&self, _variant: Variant) -> String {
        self.options.base_image.clone()
    }

    fn dockerfile(&self, variant: Variant) -> String {
        let project = &self.options.project_name;
        let mut builder = DockerfileBuilder::new();
        builder
            .from_image(self.resolve_image_name(variant))
            .copy(format!(". /go/src/github.com/{}", project))
            .run(format!("go install github.com/{}", project));

        if self.options.is_web_project {
            builder.expose(self.options.port_or_default());
        }
        builder.entrypoint(format!("/go/bin/{}", project));

        builder.render()
    }

    fn compose_file(&self, variant: Variant) -> String {
        standard_compose(&self.options, variant, &[], &[], &[])
    }

    fn template_set(&self) -> TemplateSet {
        TemplateSet::generic()
    }
}
