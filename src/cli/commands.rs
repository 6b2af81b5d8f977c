use crate::config::StackKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Docker asset generator for containerizing existing projects
#[derive(Parser, Debug)]
#[command(
    name = "dockhand",
    about = "Docker asset generator for containerizing existing projects",
    version,
    author,
    long_about = "dockhand writes the Docker assets a project needs to build and run in \
                  containers: debug and release Dockerfiles, matching compose files, and \
                  helper scripts for bash and PowerShell. Where a stack keeps runtime \
                  configuration in project files, those files are patched in place with \
                  a backup of the original."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate Docker assets for a project",
        long_about = "Generates Dockerfiles, compose files and helper scripts for the chosen \
                      stack into the project directory, and patches stack-specific project \
                      files where needed.\n\n\
                      Examples:\n  \
                      dockhand scaffold --stack node --web\n  \
                      dockhand scaffold --stack go --project-name myapp /path/to/project\n  \
                      dockhand scaffold --stack dotnet --base-image dotnet:1.0.0-preview2-sdk --web"
    )]
    Scaffold(ScaffoldArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ScaffoldArgs {
    #[arg(
        value_name = "PATH",
        help = "Project directory (defaults to current directory)"
    )]
    pub project_dir: Option<PathBuf>,

    #[arg(short = 's', long, value_enum, help = "Target stack")]
    pub stack: StackArg,

    #[arg(
        short = 'b',
        long,
        value_name = "IMAGE",
        help = "Base image (defaults to the stack's standard image)"
    )]
    pub base_image: Option<String>,

    #[arg(
        short = 'p',
        long,
        value_name = "PORT",
        help = "Port the application listens on (web projects only, default 3000)"
    )]
    pub port: Option<u16>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Image name (defaults to the lowercased project name)"
    )]
    pub image_name: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Compose service name (defaults to the image name)"
    )]
    pub service_name: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Project name (defaults to the project directory name)"
    )]
    pub project_name: Option<String>,

    #[arg(short = 'w', long, help = "Project serves HTTP traffic")]
    pub web: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackArg {
    Node,
    Go,
    Dotnet,
    Python,
    Other,
}

impl From<StackArg> for StackKind {
    fn from(arg: StackArg) -> Self {
        match arg {
            StackArg::Node => StackKind::Node,
            StackArg::Go => StackKind::Go,
            StackArg::Dotnet => StackKind::Dotnet,
            StackArg::Python => StackKind::Python,
            StackArg::Other => StackKind::Generic,
        }
    }
}
