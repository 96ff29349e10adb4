//! Host-side presets: options plus variable and unit tables loaded from JSON.
//!
//! ```json
//! { "max_arguments": 16, "variables": { "width": 350 }, "units": { "px": 2, "%": 7 } }
//! ```
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{Context, Options};
use crate::errors::ConfigError;
use crate::Number;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub options: Options,
    pub variables: BTreeMap<String, Number>,
    pub units: BTreeMap<String, Number>,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Names that the grammar could never reach are rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self.variables.keys().find(|n| !is_identifier(n)) {
            return Err(ConfigError::VariableName(name.clone()));
        }
        if let Some(name) = self.units.keys().find(|n| !is_unit_name(n)) {
            return Err(ConfigError::UnitName(name.clone()));
        }
        Ok(())
    }

    /// Register every variable and unit on `ctx`, overwriting existing entries.
    pub fn apply(&self, ctx: &mut Context) {
        *ctx.options_mut() = self.options;
        for (name, value) in &self.variables {
            ctx.set_variable(name.as_str(), *value);
        }
        for (name, scale) in &self.units {
            ctx.set_unit(name.as_str(), *scale);
        }
    }

    pub fn into_context(self) -> Context {
        let mut ctx = Context::with_options(self.options);
        self.apply(&mut ctx);
        ctx
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_unit_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '_' || c == '%')
}
