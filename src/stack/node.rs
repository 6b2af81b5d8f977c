//! Node.js profile.
//!
//! Debug images carry nodemon and expose the inspector port; whether the
//! watcher starts in break mode is decided at container start by the
//! `REMOTE_DEBUGGING` environment variable, so that branch is baked into the
//! rendered ENTRYPOINT as a shell conditional rather than resolved here.

use super::{standard_compose, StackProfile};
use crate::config::{ScaffoldOptions, StackKind, Variant};
use crate::emit::DockerfileBuilder;
use crate::templates::TemplateSet;

/// Inspector port published by debug images.
const DEBUG_PORT: u16 = 5858;

const DEBUG_ENTRYPOINT: &str = "[\"/bin/bash\", \"-c\", \"if [ -z \\\"$REMOTE_DEBUGGING\\\" ]; \
                                then nodemon -L --debug; else nodemon -L --debug-brk; fi\"]";

pub struct NodeProfile {
    options: ScaffoldOptions,
}

impl NodeProfile {
    pub fn new(options: ScaffoldOptions) -> Self {
        Self { options }
    }
}

impl StackProfile for NodeProfile {
    fn kind(&self) -> StackKind {
        StackKind::Node
    }

    fn resolve_image_name(&self, _variant: Variant) -> String {
        self.options.base_image.clone()
    }

    fn dockerfile(&self, variant: Variant) -> String {
        let mut builder = DockerfileBuilder::new();
        builder
            .from_image(self.resolve_image_name(variant))
            .run("mkdir /src")
            .copy("package.json /src")
            .workdir("/src");

        if variant == Variant::Debug {
            builder.run("npm install nodemon -g");
        }
        builder.run("npm install").copy(". /src");

        if self.options.is_web_project {
            builder.expose(self.options.port_or_default());
        }

        match variant {
            Variant::Debug => {
                builder.expose(DEBUG_PORT).entrypoint(DEBUG_ENTRYPOINT);
            }
            Variant::Release => {
                builder.entrypoint("[\"npm\", \"start\"]");
            }
        }

        builder.render()
    }

    fn compose_file(&self, variant: Variant) -> String {
        match variant {
            Variant::Debug => standard_compose(
                &self.options,
                variant,
                &[format!("{}:{}", DEBUG_PORT, DEBUG_PORT)],
                &[".:/src".to_string()],
                &["REMOTE_DEBUGGING".to_string()],
            ),
            Variant::Release => standard_compose(&self.options, variant, &[], &[], &[]),
        }
    }

    fn template_set(&self) -> TemplateSet {
        TemplateSet::node()
    }
}
