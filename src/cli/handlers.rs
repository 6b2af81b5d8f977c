//! Scaffold command handler.
//!
//! Drives one generator run as a linear pipeline: fill in option defaults,
//! validate, render both variants of the Dockerfile and compose file, copy
//! the stack's helper templates, then run the stack's project-file patches
//! followed by the editor settings patch. Render failures abort the run;
//! patch failures are collected and reported per file so a half-readable
//! project still gets its remaining assets.

use crate::cli::commands::ScaffoldArgs;
use crate::config::{sanitize_project_name, ScaffoldOptions, StackKind, Variant, DEFAULT_PORT};
use crate::patch::{settings, PatchOutcome, PatchReport};
use crate::stack::profile_for;
use crate::templates;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Outcome of a scaffold run that got past validation.
pub struct ScaffoldSummary {
    pub project_dir: PathBuf,
    pub written: Vec<String>,
    pub notes: Vec<String>,
    pub patch_failures: usize,
}

pub async fn handle_scaffold(args: &ScaffoldArgs, quiet: bool) -> i32 {
    match run_scaffold(args).await {
        Ok(summary) => {
            if !quiet {
                for note in &summary.notes {
                    println!("{}", note);
                }
            }
            if summary.patch_failures > 0 {
                eprintln!(
                    "{} project file(s) could not be updated",
                    summary.patch_failures
                );
                1
            } else {
                if !quiet {
                    println!(
                        "Docker assets written to {}",
                        summary.project_dir.display()
                    );
                }
                0
            }
        }
        Err(err) => {
            error!("scaffold failed: {:#}", err);
            eprintln!("Error: {:#}", err);
            1
        }
    }
}

pub async fn run_scaffold(args: &ScaffoldArgs) -> Result<ScaffoldSummary> {
    let project_dir = resolve_project_dir(args)?;
    let options = build_options(args, &project_dir)?;
    options.validate()?;
    debug!(?options, "scaffolding");

    let profile = profile_for(&options);
    let mut written = Vec::new();

    for variant in [Variant::Debug, Variant::Release] {
        write_asset(
            &project_dir,
            variant.dockerfile_name(),
            &profile.dockerfile(variant),
        )
        .await?;
        write_asset(
            &project_dir,
            variant.compose_file_name(),
            &profile.compose_file(variant),
        )
        .await?;
        written.push(variant.dockerfile_name().to_string());
        written.push(variant.compose_file_name().to_string());
    }

    write_templates(&project_dir, &options, profile.template_set(), &mut written).await?;

    let mut reports = profile.patch_project(&project_dir).await;
    // Editor settings come last; they are stack-independent.
    let settings_target = format!("{}/{}", settings::SETTINGS_DIR, settings::SETTINGS_FILE);
    let result = settings::ensure_dockerfile_association(&project_dir).await;
    reports.push(PatchReport::new(settings_target, result));

    let mut notes = Vec::new();
    let mut patch_failures = 0;
    for report in &reports {
        match &report.result {
            Ok(PatchOutcome::Unchanged) => {
                debug!(target = %report.target, "already up to date");
            }
            Ok(PatchOutcome::Patched(note)) => notes.push(note.clone()),
            Err(err) => {
                patch_failures += 1;
                notes.push(format!("Failed to update {}: {}", report.target, err));
            }
        }
    }

    info!(
        files = written.len(),
        patches = reports.len(),
        failures = patch_failures,
        "scaffold finished"
    );

    Ok(ScaffoldSummary {
        project_dir,
        written,
        notes,
        patch_failures,
    })
}

fn resolve_project_dir(args: &ScaffoldArgs) -> Result<PathBuf> {
    match &args.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("Failed to resolve current directory"),
    }
}

fn build_options(args: &ScaffoldArgs, project_dir: &Path) -> Result<ScaffoldOptions> {
    let stack = StackKind::from(args.stack);

    let base_image = match &args.base_image {
        Some(image) => image.clone(),
        None => default_base_image(stack)
            .ok_or_else(|| anyhow!("--base-image is required for --stack other"))?
            .to_string(),
    };

    let raw_project_name = match &args.project_name {
        Some(name) => name.clone(),
        None => project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string()),
    };
    let project_name = sanitize_project_name(&raw_project_name);

    let image_name = args
        .image_name
        .clone()
        .unwrap_or_else(|| project_name.to_lowercase());
    let service_name = args.service_name.clone().unwrap_or_else(|| image_name.clone());

    let port = if args.web {
        Some(args.port.unwrap_or(DEFAULT_PORT))
    } else {
        args.port
    };

    Ok(ScaffoldOptions {
        stack,
        base_image,
        port,
        image_name,
        service_name,
        project_name,
        is_web_project: args.web,
    })
}

/// Standard image for each stack when none is given. The generic stack has no
/// sensible default.
fn default_base_image(stack: StackKind) -> Option<&'static str> {
    match stack {
        StackKind::Node => Some("node:argon"),
        StackKind::Go => Some("golang"),
        StackKind::Dotnet => Some("dotnet:1.0.0-preview2-sdk"),
        StackKind::Python => Some("python:3-onbuild"),
        StackKind::Generic => None,
    }
}

async fn write_asset(project_dir: &Path, name: &str, contents: &str) -> Result<()> {
    let path = project_dir.join(name);
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(file = name, "wrote");
    Ok(())
}

async fn write_templates(
    project_dir: &Path,
    options: &ScaffoldOptions,
    set: templates::TemplateSet,
    written: &mut Vec<String>,
) -> Result<()> {
    let vars = [
        ("imageName", options.image_name.clone()),
        ("serviceName", options.service_name.clone()),
        ("projectName", options.project_name.clone()),
        ("port", options.port_or_default().to_string()),
        ("isWebProject", options.is_web_project.to_string()),
    ];

    let script_sh = rendered(set.script_sh, &vars)?;
    let sh_path = project_dir.join(templates::SCRIPT_SH_DEST);
    tokio::fs::write(&sh_path, script_sh)
        .await
        .with_context(|| format!("Failed to write {}", sh_path.display()))?;
    make_executable(&sh_path).await?;
    written.push(templates::SCRIPT_SH_DEST.to_string());

    let script_ps1 = rendered(set.script_ps1, &vars)?;
    let ps1_path = project_dir.join(templates::SCRIPT_PS1_DEST);
    tokio::fs::write(&ps1_path, script_ps1)
        .await
        .with_context(|| format!("Failed to write {}", ps1_path.display()))?;
    written.push(templates::SCRIPT_PS1_DEST.to_string());

    let tasks = rendered(set.tasks, &vars)?;
    let tasks_path = project_dir.join(templates::TASKS_DEST);
    if let Some(parent) = tasks_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&tasks_path, tasks)
        .await
        .with_context(|| format!("Failed to write {}", tasks_path.display()))?;
    written.push(templates::TASKS_DEST.to_string());

    Ok(())
}

fn rendered(name: &str, vars: &[(&str, String)]) -> Result<String> {
    let template =
        templates::content(name).ok_or_else(|| anyhow!("Unknown template '{}'", name))?;
    Ok(templates::render(template, vars))
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
