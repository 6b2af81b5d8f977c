//! Embedded helper-file templates.
//!
//! The task scripts and the editor task definition ship inside the binary and
//! are rendered with a `{{name}}` substitution pass. Which template a run
//! gets is decided by the stack profile's [`TemplateSet`]; there is one
//! family per script flavor (generic, node with a compose-for-debug step,
//! web-framework with publish and debugger-attach steps), each in a POSIX
//! shell and a PowerShell edition.

/// Template selection for one scaffold run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSet {
    pub script_sh: &'static str,
    pub script_ps1: &'static str,
    pub tasks: &'static str,
}

/// Destination name of the POSIX task script.
pub const SCRIPT_SH_DEST: &str = "dockerTask.sh";

/// Destination name of the PowerShell task script.
pub const SCRIPT_PS1_DEST: &str = "dockerTask.ps1";

/// Destination of the editor task definition, relative to the project root.
pub const TASKS_DEST: &str = ".vscode/tasks.json";

pub const GENERIC_SH: &str = "dockerTask.sh";
pub const GENERIC_PS1: &str = "dockerTask.ps1";
pub const NODE_SH: &str = "dockerTask.node.sh";
pub const NODE_PS1: &str = "dockerTask.node.ps1";
pub const DOTNET_SH: &str = "dockerTask.dotnet.sh";
pub const DOTNET_PS1: &str = "dockerTask.dotnet.ps1";
pub const TASKS_JSON: &str = "tasks.json";

impl TemplateSet {
    pub fn generic() -> Self {
        Self {
            script_sh: GENERIC_SH,
            script_ps1: GENERIC_PS1,
            tasks: TASKS_JSON,
        }
    }

    pub fn node() -> Self {
        Self {
            script_sh: NODE_SH,
            script_ps1: NODE_PS1,
            tasks: TASKS_JSON,
        }
    }

    pub fn dotnet() -> Self {
        Self {
            script_sh: DOTNET_SH,
            script_ps1: DOTNET_PS1,
            tasks: TASKS_JSON,
        }
    }
}

/// Embedded template text for a template name.
pub fn content(name: &str) -> Option<&'static str> {
    match name {
        GENERIC_SH => Some(include_str!("dockerTask.sh.tpl")),
        GENERIC_PS1 => Some(include_str!("dockerTask.ps1.tpl")),
        NODE_SH => Some(include_str!("dockerTask.node.sh.tpl")),
        NODE_PS1 => Some(include_str!("dockerTask.node.ps1.tpl")),
        DOTNET_SH => Some(include_str!("dockerTask.dotnet.sh.tpl")),
        DOTNET_PS1 => Some(include_str!("dockerTask.dotnet.ps1.tpl")),
        TASKS_JSON => Some(include_str!("tasks.json.tpl")),
        _ => None,
    }
}

/// Replaces every `{{key}}` marker with its value. Unknown markers are left
/// in place so a stale template shows up in review instead of vanishing.
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    let mut rendered = template.to_string();
    for (key, value) in vars {
        rendered = rendered.replace(&format!("{{{{{}}}}}", key), value);
    }
    rendered
}
