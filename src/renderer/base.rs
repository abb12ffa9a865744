use log::debug;
use minijinja::Environment;

use super::minijinja::new_environment;
use crate::error::Result;

/// Named common templates compiled once per run.
///
/// The collection is never mutated while rendering: each render works on a
/// clone of the underlying environment.
#[derive(Clone)]
pub struct BaseTemplates {
    env: Environment<'static>,
    names: Vec<String>,
}

impl BaseTemplates {
    pub fn new() -> Self {
        Self { env: new_environment(), names: Vec::new() }
    }

    /// Compiles `source` under `name`; a parse error is a render failure.
    pub fn add(&mut self, name: &str, source: String) -> Result<()> {
        let normalized_name = name.replace('\\', "/");
        debug!("Compiling common template: {normalized_name}");
        self.env.add_template_owned(normalized_name.clone(), source)?;
        self.names.push(normalized_name);
        Ok(())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Disposable copy of the environment holding every common template.
    pub(crate) fn fork(&self) -> Environment<'static> {
        self.env.clone()
    }
}

impl Default for BaseTemplates {
    fn default() -> Self {
        Self::new()
    }
}
