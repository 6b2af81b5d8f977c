//! Line emitters for the generated container definition files.
//!
//! Both builders accumulate directives in call order and render them into the
//! target text format. Rendering is pure: calling it twice on the same builder
//! yields identical output, and no directive can be removed once appended.

pub mod compose;
pub mod dockerfile;

pub use compose::ComposeBuilder;
pub use dockerfile::DockerfileBuilder;
