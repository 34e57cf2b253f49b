use std::collections::HashMap;

use edgepanel_core::query::{VariableBinding, VariableFlags, VariableValue};
use edgepanel_logging::trace;

use crate::{interpolate, Template};

/// Formats a bound value for substitution at a placeholder
pub type FormatFn<'a> = dyn Fn(&VariableValue, VariableFlags) -> String + 'a;

/// Finds placeholders in query text and substitutes their bound values
pub trait TemplateEngine: Send + Sync {
    /// Replaces every placeholder with a known binding using `format`.
    /// Bindings in `scoped` take precedence over the engine's own.
    fn replace(&self, text: &str, scoped: &ScopedVars, format: &FormatFn) -> String;
}

/// Variable bindings keyed by name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScopedVars {
    vars: HashMap<String, VariableBinding>,
}

impl ScopedVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the binding, replacing one with the same name
    pub fn insert(&mut self, binding: VariableBinding) {
        self.vars.insert(binding.name.clone(), binding);
    }

    pub fn get(&self, name: &str) -> Option<&VariableBinding> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<VariableBinding> for ScopedVars {
    fn from_iter<T: IntoIterator<Item = VariableBinding>>(iter: T) -> Self {
        let mut vars = Self::new();
        for binding in iter {
            vars.insert(binding);
        }
        vars
    }
}

/// Template engine over a fixed set of dashboard variables.
///
/// Understands `$name`, `${name}`, `${name:format}`, `[[name]]` and
/// `[[name:format]]`. Placeholders without a binding are left untouched.
#[derive(Debug, Clone, Default)]
pub struct VariableTemplateEngine {
    variables: ScopedVars,
}

impl VariableTemplateEngine {
    pub fn new(variables: impl IntoIterator<Item = VariableBinding>) -> Self {
        Self {
            variables: variables.into_iter().collect(),
        }
    }

    pub fn variables(&self) -> &ScopedVars {
        &self.variables
    }

    pub fn set(&mut self, binding: VariableBinding) {
        self.variables.insert(binding);
    }
}

impl TemplateEngine for VariableTemplateEngine {
    fn replace(&self, text: &str, scoped: &ScopedVars, format: &FormatFn) -> String {
        Template::parse(text).render(|p| {
            let binding = scoped
                .get(&p.name)
                .or_else(|| self.variables.get(&p.name))?;
            let val = format(&binding.value, binding.flags());

            trace!("Replaced placeholder '{}' with '{}'", p, val);
            Some(val)
        })
    }
}

/// Renders the query text, formatting values with [`interpolate`].
///
/// Without an engine the text is returned unchanged.
pub fn render(text: &str, engine: Option<&dyn TemplateEngine>, scoped: &ScopedVars) -> String {
    match engine {
        Some(engine) => engine.replace(text, scoped, &interpolate),
        None => text.to_string(),
    }
}
