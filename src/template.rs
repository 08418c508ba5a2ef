use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::devbox::Devbox;
use crate::error::{DevboxError, Result};

pub type TemplateEnv = Environment<'static>;

/// Template environment for manifest commands.
///
/// Undefined lookups are errors so a misspelled placeholder never reaches
/// the devbox as literal text.
pub fn create_template_env() -> TemplateEnv {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

#[derive(Serialize)]
struct BoxVars<'a> {
    user: &'a str,
    shell: &'a str,
    name: &'a str,
    namespace: &'a str,
    home: String,
}

#[derive(Serialize)]
struct CommandContext<'a> {
    #[serde(rename = "box")]
    devbox: BoxVars<'a>,
}

/// Render a command template for `devbox`.
///
/// Available placeholders: `box.user`, `box.shell`, `box.name`,
/// `box.namespace` (empty for local devboxes) and `box.home`.
pub fn render_command(env: &TemplateEnv, template: &str, devbox: &Devbox) -> Result<String> {
    let context = CommandContext {
        devbox: BoxVars {
            user: devbox.user(),
            shell: devbox.resolve_shell(None),
            name: &devbox.name,
            namespace: devbox.runtime.namespace().unwrap_or(""),
            home: devbox.home_dir(),
        },
    };
    env.render_str(template, &context).map_err(|e| {
        DevboxError::validation(format!("cannot render command template '{template}': {e}"))
    })
}
