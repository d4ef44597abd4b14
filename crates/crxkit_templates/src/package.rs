//! Package descriptor (`package.json`) model and merge.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TemplateResult;

/// A `package.json` with its three merge-relevant maps typed out.
///
/// Every other top-level key is kept in `fields`. All maps keep document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub scripts: IndexMap<String, String>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: IndexMap<String, String>,
}

impl PackageDescriptor {
    pub fn from_json_str(content: &str) -> TemplateResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Pretty JSON with two-space indent and a trailing newline.
    pub fn to_json_string(&self) -> TemplateResult<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

/// Merge a base descriptor with a specific one.
///
/// Top-level keys are merged shallowly with `specific` winning. `scripts`,
/// `dependencies` and `devDependencies` are merged key by key, again with
/// `specific` winning, and are always present in the result. An overridden
/// key keeps its base position; new keys follow in `specific` order.
pub fn merge_package_json(base: &PackageDescriptor, specific: &PackageDescriptor) -> PackageDescriptor {
    let mut fields = base.fields.clone();
    for (key, value) in &specific.fields {
        fields.insert(key.clone(), value.clone());
    }

    PackageDescriptor {
        fields,
        scripts: merge_map(&base.scripts, &specific.scripts),
        dependencies: merge_map(&base.dependencies, &specific.dependencies),
        dev_dependencies: merge_map(&base.dev_dependencies, &specific.dev_dependencies),
    }
}

fn merge_map(
    base: &IndexMap<String, String>,
    specific: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut merged = base.clone();
    merged.extend(specific.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
