//! Template descriptors and the template registry.
//!
//! Descriptors come from `template.yaml` files and are frozen once the
//! registry is built. A descriptor may name another one in `extends`;
//! [`TemplateRegistry::get_with_base`] resolves that chain into a merged view.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Range used when a dependency spec has none.
pub const DEFAULT_RANGE: &str = "latest";

/// Identity and metadata for one template variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    /// Unique template identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Template description
    #[serde(default)]
    pub description: String,
    /// Id of the template this one inherits from
    #[serde(default)]
    pub extends: Option<String>,
    /// npm scripts contributed by this template
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    /// Runtime dependencies as `name@range`
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Development dependencies as `name@range`
    #[serde(default)]
    pub dev_dependencies: Vec<String>,
    /// Tags for filtering
    #[serde(default)]
    pub tags: Vec<String>,
    /// Root of this template's file tree, set by the loader
    #[serde(skip)]
    pub files_root: PathBuf,
}

impl TemplateDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            extends: None,
            scripts: BTreeMap::new(),
            dependencies: Vec::new(),
            dev_dependencies: Vec::new(),
            tags: Vec::new(),
            files_root: PathBuf::new(),
        }
    }

    pub fn with_extends(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    pub fn with_script(mut self, name: impl Into<String>, command: impl Into<String>) -> Self {
        self.scripts.insert(name.into(), command.into());
        self
    }

    pub fn with_dependency(mut self, spec: impl Into<String>) -> Self {
        self.dependencies.push(spec.into());
        self
    }

    pub fn with_dev_dependency(mut self, spec: impl Into<String>) -> Self {
        self.dev_dependencies.push(spec.into());
        self
    }

    pub fn with_files_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.files_root = root.into();
        self
    }

    /// Dependencies as a name → range map; later entries win.
    pub fn dependency_map(&self) -> BTreeMap<String, String> {
        expand_specs(&self.dependencies)
    }

    /// Dev dependencies as a name → range map; later entries win.
    pub fn dev_dependency_map(&self) -> BTreeMap<String, String> {
        expand_specs(&self.dev_dependencies)
    }

    /// Merge this descriptor on top of `base`.
    fn inherit_from(&self, base: &TemplateDescriptor) -> TemplateDescriptor {
        let mut merged = self.clone();
        merged.dependencies = base
            .dependencies
            .iter()
            .chain(&self.dependencies)
            .cloned()
            .collect();
        merged.dev_dependencies = base
            .dev_dependencies
            .iter()
            .chain(&self.dev_dependencies)
            .cloned()
            .collect();
        merged.scripts = base.scripts.clone();
        merged
            .scripts
            .extend(self.scripts.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

fn expand_specs(specs: &[String]) -> BTreeMap<String, String> {
    specs
        .iter()
        .map(|s| DependencySpec::parse(s))
        .map(|d| (d.name, d.range))
        .collect()
}

/// A parsed `name@range` dependency string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: String,
    pub range: String,
}

impl DependencySpec {
    /// Split at the last `@` that is not the leading scope marker.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        match spec.rfind('@') {
            Some(at) if at > 0 => Self {
                name: spec[..at].to_string(),
                range: spec[at + 1..].to_string(),
            },
            _ => Self {
                name: spec.to_string(),
                range: DEFAULT_RANGE.to_string(),
            },
        }
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.range)
    }
}

/// Registry of available templates.
///
/// Built once (usually by [`crate::TemplateLoader`]) and read-only afterwards,
/// so it can be shared across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateDescriptor>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors. The first descriptor for an id wins.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = TemplateDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    pub(crate) fn register(&mut self, descriptor: TemplateDescriptor) {
        if self.templates.contains_key(&descriptor.id) {
            warn!("Duplicate template id '{}'; keeping the first", descriptor.id);
            return;
        }
        debug!("Registering template: {}", descriptor.id);
        self.templates.insert(descriptor.id.clone(), descriptor);
    }

    /// Get a template by ID.
    pub fn get(&self, id: &str) -> Option<&TemplateDescriptor> {
        self.templates.get(id)
    }

    /// Get a template with its `extends` chain merged in.
    ///
    /// Dependencies are concatenated root-most base first; scripts are merged
    /// with the more specific template winning. An unknown or cyclic `extends`
    /// stops the walk and merges only what was resolved.
    pub fn get_with_base(&self, id: &str) -> Option<TemplateDescriptor> {
        let specific = self.get(id)?;

        let mut chain = Vec::new();
        let mut visited = HashSet::from([specific.id.as_str()]);
        let mut current = specific;
        while let Some(base_id) = current.extends.as_deref() {
            if !visited.insert(base_id) {
                warn!("Template '{}' has a cyclic extends chain at '{}'", id, base_id);
                break;
            }
            match self.get(base_id) {
                Some(base) => {
                    chain.push(base);
                    current = base;
                }
                None => {
                    warn!(
                        "Template '{}' extends unknown template '{}'",
                        current.id, base_id
                    );
                    break;
                }
            }
        }

        let Some((root, rest)) = chain.split_last() else {
            return Some(specific.clone());
        };
        let inherited = rest
            .iter()
            .rev()
            .fold((*root).clone(), |acc, next| next.inherit_from(&acc));
        Some(specific.inherit_from(&inherited))
    }

    /// Check if a template exists.
    pub fn has(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// All templates, sorted by id.
    pub fn list(&self) -> Vec<&TemplateDescriptor> {
        let mut templates: Vec<_> = self.templates.values().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Root of a template's file tree.
    pub fn files_root(&self, id: &str) -> Option<&Path> {
        self.get(id).map(|t| t.files_root.as_path())
    }

    /// Root of the direct base's file tree, if the base is registered.
    pub fn base_files_root(&self, id: &str) -> Option<&Path> {
        let base_id = self.get(id)?.extends.as_deref()?;
        self.files_root(base_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::from_descriptors([
            TemplateDescriptor::new("base", "Base")
                .with_script("dev", "concurrently \"vite build --watch\" \"web-ext run\"")
                .with_script("lint", "eslint .")
                .with_dev_dependency("web-ext@^8.3.0")
                .with_dev_dependency("concurrently@^9.0.0"),
            TemplateDescriptor::new("react", "React")
                .with_extends("base")
                .with_script("build", "vite build")
                .with_script("lint", "eslint src")
                .with_dependency("react@^19.0.0")
                .with_dev_dependency("vite@^7.2.2"),
            TemplateDescriptor::new("orphan", "Orphan").with_extends("missing"),
        ])
    }

    #[test]
    fn test_manifest_from_yaml() {
        let descriptor: TemplateDescriptor = serde_yaml::from_str(
            r#"
id: vue
name: Vue
description: Vue 3 + Vite
extends: base
scripts:
  build: vite build
dependencies:
  - vue@^3.5.0
devDependencies:
  - "@vitejs/plugin-vue@^6.0.0"
"#,
        )
        .unwrap();
        assert_eq!(descriptor.extends.as_deref(), Some("base"));
        assert_eq!(descriptor.dev_dependencies, vec!["@vitejs/plugin-vue@^6.0.0"]);
        assert!(descriptor.tags.is_empty());
    }

    #[test]
    fn test_get_is_plain_lookup() {
        let registry = registry();
        let react = registry.get("react").unwrap();
        assert_eq!(react.dev_dependencies, vec!["vite@^7.2.2"]);
        assert!(registry.get("nope").is_none());
        assert!(registry.has("base"));
        assert!(!registry.has("nope"));
    }

    #[test]
    fn test_get_with_base_merges_chain() {
        let merged = registry().get_with_base("react").unwrap();
        assert_eq!(
            merged.dev_dependencies,
            vec!["web-ext@^8.3.0", "concurrently@^9.0.0", "vite@^7.2.2"]
        );
        assert_eq!(merged.dependencies, vec!["react@^19.0.0"]);
        assert_eq!(merged.scripts["lint"], "eslint src");
        assert!(merged.scripts.contains_key("dev"));
        assert!(merged.scripts.contains_key("build"));
        assert_eq!(merged.id, "react");
        assert_eq!(merged.extends.as_deref(), Some("base"));
    }

    #[test]
    fn test_get_with_base_soft_failures() {
        let registry = registry();
        assert!(registry.get_with_base("nope").is_none());
        assert_eq!(
            registry.get_with_base("orphan").as_ref(),
            registry.get("orphan")
        );
        assert_eq!(registry.get_with_base("base").as_ref(), registry.get("base"));
    }

    #[test]
    fn test_get_with_base_multi_level_and_cycle() {
        let registry = TemplateRegistry::from_descriptors([
            TemplateDescriptor::new("root", "Root").with_dependency("a@1"),
            TemplateDescriptor::new("mid", "Mid")
                .with_extends("root")
                .with_dependency("b@1"),
            TemplateDescriptor::new("leaf", "Leaf")
                .with_extends("mid")
                .with_dependency("c@1"),
            TemplateDescriptor::new("x", "X").with_extends("y").with_dependency("x@1"),
            TemplateDescriptor::new("y", "Y").with_extends("x").with_dependency("y@1"),
        ]);

        let leaf = registry.get_with_base("leaf").unwrap();
        assert_eq!(leaf.dependencies, vec!["a@1", "b@1", "c@1"]);

        let x = registry.get_with_base("x").unwrap();
        assert_eq!(x.dependencies, vec!["y@1", "x@1"]);
    }

    #[test]
    fn test_dependency_spec_parse() {
        assert_eq!(
            DependencySpec::parse("@types/chrome@^0.0.280"),
            DependencySpec {
                name: "@types/chrome".into(),
                range: "^0.0.280".into()
            }
        );
        assert_eq!(DependencySpec::parse("vite@^7.2.2").name, "vite");
        assert_eq!(DependencySpec::parse("@crxjs/vite-plugin").range, DEFAULT_RANGE);
        assert_eq!(DependencySpec::parse("typescript").range, DEFAULT_RANGE);
        assert_eq!(DependencySpec::parse("vite@^7").to_string(), "vite@^7");
    }

    #[test]
    fn test_dependency_map_later_wins() {
        let merged = TemplateDescriptor::new("t", "T")
            .with_dev_dependency("concurrently@^9.0.0")
            .with_dev_dependency("concurrently@^9.1.0");
        assert_eq!(merged.dev_dependency_map()["concurrently"], "^9.1.0");
    }

    #[test]
    fn test_list_sorted_and_roots() {
        let registry = TemplateRegistry::from_descriptors([
            TemplateDescriptor::new("vue", "Vue")
                .with_extends("base")
                .with_files_root("/t/vue/template"),
            TemplateDescriptor::new("base", "Base").with_files_root("/t/base/template"),
            TemplateDescriptor::new("base", "Shadow"),
        ]);
        let ids: Vec<_> = registry.list().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["base", "vue"]);
        assert_eq!(registry.get("base").unwrap().name, "Base");
        assert_eq!(
            registry.base_files_root("vue"),
            Some(Path::new("/t/base/template"))
        );
        assert_eq!(registry.base_files_root("base"), None);
    }
}
