//! Template rendering capability.
//!
//! Nodes only depend on the narrow [`TemplateEngine`] contract: render a named
//! template with a variable mapping. [`JinjaTemplates`] is the implementation
//! used by the generator, backed by `minijinja`.

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use std::path::Path;

/// Template used for every node configuration file.
pub const NODE_CONF_TEMPLATE: &str = "node_conf.toml.j2";

/// Template used for the validator deployment variables.
pub const VALIDATOR_YAML_TEMPLATE: &str = "ansible.yml.j2";

/// Template used for the devnet genesis.
pub const GENESIS_TEMPLATE: &str = "genesis.toml.j2";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (NODE_CONF_TEMPLATE, include_str!("../templates/node_conf.toml.j2")),
    (VALIDATOR_YAML_TEMPLATE, include_str!("../templates/ansible.yml.j2")),
    (GENESIS_TEMPLATE, include_str!("../templates/genesis.toml.j2")),
];

/// Errors reported by a templating backend
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("failed to render template '{template}': {message}")]
    Render { template: String, message: String },
}

/// Load-and-render contract the nodes depend on.
pub trait TemplateEngine {
    /// Render template `name` with `context`.
    ///
    /// Returns [`TemplateError::NotFound`] when no template with that name
    /// exists, and [`TemplateError::Render`] when the template rejects the
    /// context (for example a required variable is missing).
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, TemplateError>;
}

/// Jinja templates rendered with `minijinja`.
pub struct JinjaTemplates {
    env: Environment<'static>,
}

impl JinjaTemplates {
    /// Templates shipped with the crate.
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut env = Self::environment();
        for &(name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| render_error(name, &e))?;
        }
        Ok(Self { env })
    }

    /// Templates loaded on demand from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut env = Self::environment();
        env.set_loader(minijinja::path_loader(dir.as_ref().to_path_buf()));
        Self { env }
    }

    fn environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env
    }
}

impl TemplateEngine for JinjaTemplates {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, TemplateError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => TemplateError::NotFound(name.to_string()),
            _ => render_error(name, &e),
        })?;
        template.render(context).map_err(|e| render_error(name, &e))
    }
}

fn render_error(name: &str, err: &minijinja::Error) -> TemplateError {
    TemplateError::Render {
        template: name.to_string(),
        message: err.to_string(),
    }
}
