//! Render context: the flat variable bag used for `{{token}}` substitution.

use std::collections::BTreeMap;

/// Default version written into freshly generated projects.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// Flat mapping from variable name to value.
///
/// Well-known keys are `projectName`, `version`, `description` and `author`;
/// any other key can be added with [`RenderContext::with_variable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// Empty context. Every token stays unresolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a new project: sets `projectName`, the default `version`,
    /// an empty `description` and the derived case variants of the name.
    pub fn for_project(project_name: impl Into<String>) -> Self {
        let name = project_name.into();
        Self::new()
            .with_variable("projectNameKebab", to_kebab_case(&name))
            .with_variable("projectNameSnake", to_snake_case(&name))
            .with_variable("projectNamePascal", to_pascal_case(&name))
            .with_variable("projectName", name)
            .with_variable("version", DEFAULT_VERSION)
            .with_variable("description", "")
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variables
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_variable("description", description)
    }

    pub fn with_version(self, version: impl Into<String>) -> Self {
        self.with_variable("version", version)
    }

    pub fn with_author(self, author: impl Into<String>) -> Self {
        self.with_variable("author", author)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// A variable is truthy when it is defined and non-empty.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }
}

/// Convert string to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else if c == '-' || c == ' ' {
            result.push('_');
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert string to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Convert string to kebab-case.
pub fn to_kebab_case(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}
