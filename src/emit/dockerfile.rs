//! Dockerfile emitter.
//!
//! Accumulates `(keyword, value)` pairs and renders one directive per line as
//! `"<KEYWORD> <value>\n"`. Values are emitted verbatim; validating their
//! contents is the caller's job.

/// The fixed vocabulary of Dockerfile directives the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockerfileDirective {
    From,
    Run,
    Copy,
    Workdir,
    Expose,
    Entrypoint,
    Cmd,
}

impl DockerfileDirective {
    fn keyword(&self) -> &'static str {
        match self {
            DockerfileDirective::From => "FROM",
            DockerfileDirective::Run => "RUN",
            DockerfileDirective::Copy => "COPY",
            DockerfileDirective::Workdir => "WORKDIR",
            DockerfileDirective::Expose => "EXPOSE",
            DockerfileDirective::Entrypoint => "ENTRYPOINT",
            DockerfileDirective::Cmd => "CMD",
        }
    }
}

/// Builder for Dockerfile contents.
#[derive(Debug, Default)]
pub struct DockerfileBuilder {
    directives: Vec<(DockerfileDirective, String)>,
}

impl DockerfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_image(&mut self, image: impl Into<String>) -> &mut Self {
        self.push(DockerfileDirective::From, image)
    }

    pub fn run(&mut self, command: impl Into<String>) -> &mut Self {
        self.push(DockerfileDirective::Run, command)
    }

    pub fn copy(&mut self, spec: impl Into<String>) -> &mut Self {
        self.push(DockerfileDirective::Copy, spec)
    }

    pub fn workdir(&mut self, dir: impl Into<String>) -> &mut Self {
        self.push(DockerfileDirective::Workdir, dir)
    }

    pub fn expose(&mut self, port: u16) -> &mut Self {
        self.push(DockerfileDirective::Expose, port.to_string())
    }

    pub fn entrypoint(&mut self, command: impl Into<String>) -> &mut Self {
        self.push(DockerfileDirective::Entrypoint, command)
    }

    pub fn cmd(&mut self, command: impl Into<String>) -> &mut Self {
        self.push(DockerfileDirective::Cmd, command)
    }

    /// Renders the accumulated directives, one per line, in append order.
    pub fn render(&self) -> String {
        let mut contents = String::new();
        for (directive, value) in &self.directives {
            contents.push_str(directive.keyword());
            contents.push(' ');
            contents.push_str(value);
            contents.push('\n');
        }
        contents
    }

    fn push(&mut self, directive: DockerfileDirective, value: impl Into<String>) -> &mut Self {
        self.directives.push((directive, value.into()));
        self
    }
}
