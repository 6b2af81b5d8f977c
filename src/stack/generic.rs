//! Catch-all profile for stacks without a dedicated helper. Uses the base
//! image verbatim and a plain copy/workdir layout.

use super::{standard_compose, StackProfile};
use crate::config::{ScaffoldOptions, StackKind, Variant};
use crate::emit::DockerfileBuilder;
use crate::templates::TemplateSet;

pub struct GenericProfile {
    options: ScaffoldOptions,
}

impl GenericProfile {
    pub fn new(options: ScaffoldOptions) -> Self {
        Self { options }
    }
}

impl StackProfile for GenericProfile {
    fn kind(&self) -> StackKind {
        StackKind::Generic
    }

    fn resolve_image_name(&self, _variant: Variant) -> String {
        self.options.base_image.clone()
    }

    fn dockerfile(&self, variant: Variant) -> String {
        let mut builder = DockerfileBuilder::new();
        builder
            .from_image(self.resolve_image_name(variant))
            .copy(". /app")
            .workdir("/app");
        if self.options.is_web_project {
            builder.expose(self.options.port_or_default());
        }
        builder.cmd("[\"/bin/sh\"]");
        builder.render()
    }

    fn compose_file(&self, variant: Variant) -> String {
        standard_compose(&self.options, variant, &[], &[], &[])
    }

    fn template_set(&self) -> TemplateSet {
        TemplateSet::generic()
    }
}
