//! docker-compose emitter.
//!
//! Renders the minimal compose subset the generator needs: a service name
//! header, plain keyed directives, and the grouped list directives `ports`,
//! `volumes`, `environment`, and `labels`. A group's header line is written
//! lazily the first time an entry for it is appended, tracked with an explicit
//! per-group flag rather than by searching the output rendered so far (a value
//! that happens to contain a group keyword must not suppress the header).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComposeDirective {
    ServiceName,
    Image,
    Dockerfile,
    Build,
    Port,
    Volume,
    Environment,
    Label,
}

impl ComposeDirective {
    fn group_keyword(&self) -> Option<&'static str> {
        match self {
            ComposeDirective::Port => Some("ports"),
            ComposeDirective::Volume => Some("volumes"),
            ComposeDirective::Environment => Some("environment"),
            ComposeDirective::Label => Some("labels"),
            _ => None,
        }
    }
}

/// Builder for docker-compose service definitions.
#[derive(Debug, Default)]
pub struct ComposeBuilder {
    directives: Vec<(ComposeDirective, String)>,
}

impl ComposeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service name header, rendered as `"<name>:"` at column zero.
    pub fn service_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(ComposeDirective::ServiceName, name)
    }

    pub fn image(&mut self, image: impl Into<String>) -> &mut Self {
        self.push(ComposeDirective::Image, image)
    }

    pub fn dockerfile(&mut self, file_name: impl Into<String>) -> &mut Self {
        self.push(ComposeDirective::Dockerfile, file_name)
    }

    pub fn build_context(&mut self, context: impl Into<String>) -> &mut Self {
        self.push(ComposeDirective::Build, context)
    }

    /// Port mapping, rendered as a quoted `"host:container"` list entry.
    pub fn port(&mut self, mapping: impl Into<String>) -> &mut Self {
        self.push(ComposeDirective::Port, mapping)
    }

    pub fn volume(&mut self, mount: impl Into<String>) -> &mut Self {
        self.push(ComposeDirective::Volume, mount)
    }

    pub fn environment(&mut self, variable: impl Into<String>) -> &mut Self {
        self.push(ComposeDirective::Environment, variable)
    }

    /// Label entry, rendered verbatim (caller supplies `key: "value"`).
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.push(ComposeDirective::Label, label)
    }

    /// Renders the accumulated directives. Group headers appear where the
    /// first entry of the group was appended; entries stay in call order.
    pub fn render(&self) -> String {
        let mut contents = String::new();
        let mut ports_started = false;
        let mut volumes_started = false;
        let mut environment_started = false;
        let mut labels_started = false;

        for (directive, value) in &self.directives {
            match directive {
                ComposeDirective::ServiceName => {
                    contents.push_str(value);
                    contents.push_str(":\n");
                }
                ComposeDirective::Image => push_keyed(&mut contents, "image", value),
                ComposeDirective::Dockerfile => push_keyed(&mut contents, "dockerfile", value),
                ComposeDirective::Build => push_keyed(&mut contents, "build", value),
                ComposeDirective::Port => {
                    start_group(&mut contents, directive, &mut ports_started);
                    contents.push_str("    - \"");
                    contents.push_str(value);
                    contents.push_str("\"\n");
                }
                ComposeDirective::Volume => {
                    start_group(&mut contents, directive, &mut volumes_started);
                    contents.push_str("    - ");
                    contents.push_str(value);
                    contents.push('\n');
                }
                ComposeDirective::Environment => {
                    start_group(&mut contents, directive, &mut environment_started);
                    contents.push_str("    - ");
                    contents.push_str(value);
                    contents.push('\n');
                }
                ComposeDirective::Label => {
                    start_group(&mut contents, directive, &mut labels_started);
                    contents.push_str("    ");
                    contents.push_str(value);
                    contents.push('\n');
                }
            }
        }

        contents
    }

    fn push(&mut self, directive: ComposeDirective, value: impl Into<String>) -> &mut Self {
        self.directives.push((directive, value.into()));
        self
    }
}

fn push_keyed(contents: &mut String, keyword: &str, value: &str) {
    contents.push_str("  ");
    contents.push_str(keyword);
    contents.push_str(": ");
    contents.push_str(value);
    contents.push('\n');
}

fn start_group(contents: &mut String, directive: &ComposeDirective, started: &mut bool) {
    if !*started {
        // Only grouped directives reach this path.
        let keyword = directive.group_keyword().unwrap();
        contents.push_str("  ");
        contents.push_str(keyword);
        contents.push_str(":\n");
        *started = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_definition() {
        let mut builder = ComposeBuilder::new();
        builder
            .service_name("web")
            .image("testimagename:debug")
            .dockerfile("Dockerfile.debug")
            .build_context(".");

        assert_eq!(
            builder.render(),
            "web:\n  image: testimagename:debug\n  dockerfile: Dockerfile.debug\n  build: .\n"
        );
    }

    #[test]
    fn test_ports_share_one_header_in_append_order() {
        let mut builder = ComposeBuilder::new();
        builder
            .service_name("web")
            .port("3000:3000")
            .port("5858:5858")
            .port("9229:9229");

        let rendered = builder.render();
        assert_eq!(rendered.matches("ports:").count(), 1);
        assert_eq!(
            rendered,
            "web:\n  ports:\n    - \"3000:3000\"\n    - \"5858:5858\"\n    - \"9229:9229\"\n"
        );
    }

    #[test]
    fn test_no_ports_means_no_ports_header() {
        let mut builder = ComposeBuilder::new();
        builder.service_name("web").build_context(".");
        assert!(!builder.render().contains("ports:"));
    }

    #[test]
    fn test_value_containing_group_keyword_does_not_suppress_header() {
        // Group state must come from the flags, not from searching rendered
        // output, or a label mentioning "ports" would eat the ports: header.
        let mut builder = ComposeBuilder::new();
        builder
            .service_name("web")
            .label("com.example.ports: \"many\"")
            .port("80:80");

        let rendered = builder.render();
        assert!(rendered.contains("  ports:\n    - \"80:80\"\n"));
    }

    #[test]
    fn test_volumes_and_environment_entries_are_unquoted() {
        let mut builder = ComposeBuilder::new();
        builder
            .service_name("web")
            .volume(".:/src")
            .environment("REMOTE_DEBUGGING");

        assert_eq!(
            builder.render(),
            "web:\n  volumes:\n    - .:/src\n  environment:\n    - REMOTE_DEBUGGING\n"
        );
    }

    #[test]
    fn test_labels_render_verbatim() {
        let mut builder = ComposeBuilder::new();
        builder
            .service_name("web")
            .label("com.testimagename.environment: \"release\"");

        assert!(builder
            .render()
            .contains("  labels:\n    com.testimagename.environment: \"release\"\n"));
    }

    #[test]
    fn test_group_order_follows_first_append() {
        let mut builder = ComposeBuilder::new();
        builder
            .service_name("web")
            .volume(".:/src")
            .port("80:80")
            .volume("data:/data");

        let rendered = builder.render();
        let volumes_at = rendered.find("volumes:").unwrap();
        let ports_at = rendered.find("ports:").unwrap();
        assert!(volumes_at < ports_at);
        // The second volume entry appends after the ports block; entry order
        // mirrors the calls exactly, headers are never re-emitted.
        assert!(rendered.ends_with("    - data:/data\n"));
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut builder = ComposeBuilder::new();
        builder.service_name("web").port("80:80");
        assert_eq!(builder.render(), builder.render());
    }
}
